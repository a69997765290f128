//! Unit tests for the traversal engine and its supporting structures.

mod helpers;
