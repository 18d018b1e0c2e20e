pub mod render_interface;
