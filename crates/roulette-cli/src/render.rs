//! Terminal rendering of the profile card and the three daily screens.

use roulette_core::{DailyState, DecisionSnapshot, Level};

const BAR_WIDTH: usize = 20;

pub fn progress_bar(progress: f64) -> String {
    let filled = (progress.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn profile_card(level: &Level, streak_count: u32) -> String {
    let next = match level.points_to_next_level() {
        Some(remaining) => format!("{remaining} points to next level"),
        None => "Max level reached!".to_string(),
    };
    format!(
        "{title}  🔥 {streak_count}-day streak\nLV.{lv} ({points} points)\n{bar} {next}",
        title = level.title,
        lv = level.level,
        points = level.points,
        bar = progress_bar(level.progress),
    )
}

/// Screen body for the current state.
pub fn screen(snapshot: &DecisionSnapshot) -> String {
    let item = snapshot.decided_item.as_deref().unwrap_or("(unknown)");
    match snapshot.daily_state {
        DailyState::ReadyToSpin if snapshot.items.is_empty() => {
            "Add some items first.\nUse `items add <text>` to register today's options.".to_string()
        }
        DailyState::ReadyToSpin => "Start today's decision!\n  ❓\nSpin the roulette (spin).".to_string(),
        DailyState::DecisionMade => format!(
            "Today's decision is:\n  {item}\nDo it and claim your reward! (confirm: +10 points)"
        ),
        DailyState::Completed => {
            format!("✔ Mission complete!\nDone: {item}\nWant another pick? (redo)")
        }
    }
}

pub fn item_list(items: &[String]) -> String {
    if items.is_empty() {
        return "(no items)".to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{i:>3}  {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn today(snapshot: &DecisionSnapshot, level: &Level) -> String {
    format!(
        "{}\n\n{}",
        profile_card(level, snapshot.streak_count),
        screen(snapshot)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use roulette_core::level_of;

    fn snapshot(state: DailyState, item: Option<&str>) -> DecisionSnapshot {
        DecisionSnapshot {
            daily_state: state,
            decided_item: item.map(str::to_string),
            ..DecisionSnapshot::with_items(vec!["Soup".into()])
        }
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0), format!("[{}]", "-".repeat(20)));
        assert_eq!(progress_bar(1.0), format!("[{}]", "#".repeat(20)));
        assert_eq!(progress_bar(0.5), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
    }

    #[test]
    fn profile_card_shows_remaining_or_max() {
        let card = profile_card(&level_of(30), 3);
        assert!(card.contains("Beginner"));
        assert!(card.contains("3-day streak"));
        assert!(card.contains("LV.1 (30 points)"));
        assert!(card.contains("20 points to next level"));

        assert!(profile_card(&level_of(900), 0).contains("Max level reached!"));
    }

    #[test]
    fn one_screen_per_state() {
        assert!(screen(&snapshot(DailyState::ReadyToSpin, None)).contains("Start today's decision"));
        assert!(screen(&snapshot(DailyState::DecisionMade, Some("Soup"))).contains("  Soup"));
        assert!(screen(&snapshot(DailyState::Completed, Some("Soup"))).contains("Done: Soup"));

        let empty = DecisionSnapshot::with_items(Vec::new());
        assert!(screen(&empty).contains("Add some items first"));
    }

    #[test]
    fn item_list_is_indexed() {
        let listed = item_list(&["A".to_string(), "B".to_string()]);
        assert_eq!(listed, "  0  A\n  1  B");
        assert_eq!(item_list(&[]), "(no items)");
    }
}
