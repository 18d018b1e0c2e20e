pub mod car;
pub mod controls;
pub mod curves;
pub mod game;
pub mod handle_game;
pub mod incident;
pub mod obstacles;
