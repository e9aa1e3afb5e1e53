//! UserService integration tests.

mod concurrency;
