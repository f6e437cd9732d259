//! Engine layer tests: device table, handles, access guards, introspection

mod engine_tests;
