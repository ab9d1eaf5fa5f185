use waste_dispatch::simulation::runner;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runner::run()
}
