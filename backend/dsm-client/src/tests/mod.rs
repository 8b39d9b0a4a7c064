mod config;
mod credentials;
mod dispatch;
mod models;
