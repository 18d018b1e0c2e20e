/// RaceResult collects the outcome of a single run for post-processing.
#[derive(Debug, Clone, Default)]
pub struct RaceResult {
    pub race_distance: f64,
    pub total_distance: f64,
    pub sim_time_ms: f64,
    pub frames: u64,
    pub top_speed: f64,
    pub rock_hits: u32,
    pub bomb_hits: u32,
    pub absorbed_hits: u32,
    pub obstacles_spawned: u32,
    pub drift_triggered: bool,
    pub finished: bool,
}

impl RaceResult {
    /// print_summary writes the run outcome to stdout.
    pub fn print_summary(&self) {
        println!("RESULT: -------------------------------------------------");
        println!(
            "RESULT: Distance traveled: {:.2} km of {:.2} km ({})",
            self.total_distance / 1000.0,
            self.race_distance / 1000.0,
            if self.finished { "finished" } else { "DNF" }
        );
        println!(
            "RESULT: Simulated time: {:.1}s over {} frames",
            self.sim_time_ms / 1000.0,
            self.frames
        );
        println!("RESULT: Top speed: {:.3}", self.top_speed);
        println!(
            "RESULT: Obstacles: {} spawned, {} rock hits, {} bomb hits, {} absorbed",
            self.obstacles_spawned, self.rock_hits, self.bomb_hits, self.absorbed_hits
        );
        if self.drift_triggered {
            println!("RESULT: Crossed the line fast enough for a finish drift");
        }
        println!("RESULT: -------------------------------------------------");
    }
}
