use glassbox::session::PRESETS;
use glassbox::{Predictor, Session};

#[tokio::main]
async fn main() -> glassbox::Result<()> {
    tracing_subscriber::fmt::init();

    let mut session = Session::new(Predictor::from_env()?);
    session.load_preset(&PRESETS[0]);
    session.set_temperature(0.7)?;

    for _ in 0..8 {
        let prediction = session.step().await?;
        let top = prediction
            .top_candidate()
            .map_or(0.0, glassbox::TokenCandidate::probability);
        println!("{:?} ({top:.1}%)", prediction.chosen_token());
    }
    println!("{}", session.context());

    session.hallucination_test().await?;
    if session.hallucination_warning() {
        println!("hallucination risk: {}", session.context());
    }
    Ok(())
}
