//! Home Page

use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <header class="hero">
                <h1>"Math Mentor"</h1>
                <p class="tagline">"Text-to-math problem solver and data search assistant"</p>
                <div class="cta">
                    <a href="/chat" class="btn btn-primary">"Start Chatting"</a>
                </div>
            </header>

            <section class="features">
                <div class="feature">
                    <h3>"📚 Lookup"</h3>
                    <p>"Searches Wikipedia for facts and figures behind your question."</p>
                </div>
                <div class="feature">
                    <h3>"🧮 Exact"</h3>
                    <p>"Arithmetic runs through a real evaluator, never the model's imagination."</p>
                </div>
                <div class="feature">
                    <h3>"🪜 Step by Step"</h3>
                    <p>"Word problems come back as worked, numbered solutions."</p>
                </div>
            </section>
        </div>
    }
}
