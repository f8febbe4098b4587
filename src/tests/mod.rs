pub mod validate_tests;
