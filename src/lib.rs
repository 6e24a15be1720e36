pub mod calculator;
pub mod chat;
pub mod config;
pub mod events;
pub mod loading;
pub mod map;
pub mod registry;
pub mod site;
pub mod timers;
pub mod ui;
