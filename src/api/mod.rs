// API routes and handlers

pub mod activities;
pub mod assets;
pub mod auth;
pub mod coach;
pub mod dashboard;
pub mod goals;
pub mod health;
pub mod routes;
