use glassbox::{rank, reweight_prediction, Predictor};

#[tokio::main]
async fn main() -> glassbox::Result<()> {
    tracing_subscriber::fmt::init();

    let context = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "The quick brown".to_string());
    let predictor = Predictor::from_env()?;
    let prediction = predictor.predict(&context, 1.0).await?;

    println!(
        "{context}[{}]  ({} in {} ms, ~${:.8})",
        prediction.chosen_token(),
        prediction.model(),
        prediction.latency_ms(),
        prediction.estimated_cost()
    );
    for temperature in [0.2, 1.0, 1.8] {
        println!("T = {temperature}");
        for entry in rank(reweight_prediction(&prediction, temperature)) {
            let marker = if entry.is_chosen { "*" } else { " " };
            println!("  {marker} {:<16} {:6.2}%", entry.label, entry.percentage);
        }
    }
    if prediction.hallucination_risk() {
        println!("low confidence: top candidate below 40%");
    }
    Ok(())
}
