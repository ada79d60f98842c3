//! Integration tests for the relcopy binary

mod cli;
mod common;
mod copy;
