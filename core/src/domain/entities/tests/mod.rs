mod verification_request_tests;
