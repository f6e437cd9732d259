//! Console tests

mod console_tests;
