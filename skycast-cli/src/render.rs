//! Plain-text rendering of the pipeline state.

use chrono::Local;
use skycast_core::{Phase, PipelineState, view};

/// Print the whole state: current conditions, the daily outlook when
/// visible, or the failed run's message.
pub fn state(state: &PipelineState) {
    match state.phase() {
        Phase::Idle => println!("No forecast yet. Run `skycast show`."),
        Phase::Loading => println!("Loading..."),
        Phase::Error => {
            if let Some(message) = state.error_message() {
                println!("{message}");
            }
        }
        Phase::Ready => ready(state),
    }
}

fn ready(state: &PipelineState) {
    let Some(set) = state.forecast() else {
        return;
    };

    println!("{}", set.place_name);
    if let Some(fetched_at) = state.fetched_at() {
        println!("{}", view::date_label(&fetched_at.with_timezone(&Local)));
    }

    match state.current() {
        Some(sample) => {
            println!("Temperature: {}°C", sample.temperature_c);
            println!("{}", sample.condition);
            println!("{}", sample.icon_url());
        }
        None => println!("The provider returned no forecast samples."),
    }

    if state.show_daily() {
        for sample in state.daily() {
            println!();
            println!("{}", view::time_label(sample));
            println!("Temperature: {}°C", sample.temperature_c);
            println!("{}", sample.condition);
        }
    }
}
