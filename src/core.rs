pub mod aggregation;
pub mod answer;
pub mod models;
pub mod ports;
pub mod presentation;
pub mod services;
