pub mod read_game_pars;
pub mod sim_opts;
