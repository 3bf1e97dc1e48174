//! Business logic for the chat relay server.

pub mod planner;
