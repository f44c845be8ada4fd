pub mod config;
pub mod constants;
pub mod game;
pub mod solver;
pub mod web;

#[cfg(test)]
mod tests;
