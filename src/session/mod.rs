pub mod auth;

pub mod interface;

pub mod manager;

pub mod state;
