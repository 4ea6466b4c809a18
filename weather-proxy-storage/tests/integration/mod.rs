pub mod postgres_tests;
