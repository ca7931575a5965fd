pub mod album;

pub mod group;

pub mod photo;

pub mod post;

pub mod user;
