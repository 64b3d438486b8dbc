use envseed::{AppContext, EnvLoader};
use tracing_subscriber::EnvFilter;

/// Stand-in for a component that reads its settings from the context.
struct Listener<'a> {
    broker: &'a str,
    topic: &'a str,
}

fn main() -> Result<(), envseed::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load once, before anything else reads configuration
    let ctx = AppContext::builder()
        .with_loader(EnvLoader::new())?
        .build()?;

    let config = ctx.config();
    let listener = Listener {
        broker: config.get_or("BROKER_URL", "localhost:9092"),
        topic: config.get_or("LISTENER_TOPIC", "events"),
    };

    println!("Listening on {} (topic={})", listener.broker, listener.topic);
    for (key, _) in config.iter() {
        println!("  loaded {key}");
    }

    Ok(())
}
