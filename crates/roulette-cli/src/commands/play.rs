//! Interactive session: the model stays loaded between commands, so a spin
//! can be confirmed in the same session.

use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;

use chrono::NaiveDate;
use roulette_core::{Clock, Config, CoreError, DecisionModel, Event, PreferenceStore};

use super::open_model;
use crate::render;

const SPIN_FRAMES: usize = 15;
const FRAME_DELAY: Duration = Duration::from_millis(50);

const HELP: &str = "\
commands:
  spin            pick today's item
  confirm         mark it done (+10 points)
  redo            discard today's completed pick
  add <text>      add an item
  remove <i>...   remove items by index
  list            show items
  status          show the profile card and today's screen
  quit            leave";

pub fn run(config: &Config, no_animation: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut model = open_model(config)?;
    let animate = !no_animation && io::stdout().is_terminal();
    let stdin = io::stdin();
    let stdout = io::stdout();
    Session::new(&mut model, animate).run(stdin.lock(), stdout.lock())?;
    Ok(())
}

pub struct Session<'a, S, C> {
    model: &'a mut DecisionModel<S, C>,
    animate: bool,
    day: NaiveDate,
}

impl<'a, S: PreferenceStore, C: Clock> Session<'a, S, C> {
    pub fn new(model: &'a mut DecisionModel<S, C>, animate: bool) -> Self {
        let day = model.clock().today();
        Self {
            model,
            animate,
            day,
        }
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> io::Result<()> {
        self.show_today(&mut out)?;
        prompt(&mut out)?;

        for line in input.lines() {
            let line = line?;
            self.resume_if_new_day(&mut out)?;

            let line = line.trim();
            let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let rest = rest.trim_start();
            match command {
                "" => {}
                "spin" => {
                    if self.animate {
                        self.animate_spin(&mut out)?;
                    }
                    match self.model.spin_decision() {
                        Ok(Some(_)) => {}
                        Ok(None) => {
                            let reason = if self.model.items().is_empty() {
                                "No items to spin. Add some first."
                            } else {
                                "Today's decision is already made."
                            };
                            writeln!(out, "{reason}")?;
                        }
                        Err(e) => report_error(&mut out, &e)?,
                    }
                    self.show_today(&mut out)?;
                }
                "confirm" => {
                    let result = self.model.confirm_decision();
                    match report(&mut out, result)? {
                        Some(Event::DecisionConfirmed { level_up, .. }) => {
                            if let Some(level) = level_up {
                                writeln!(out, "Level up! You reached LV.{level}.")?;
                            }
                        }
                        Some(_) => {}
                        None => writeln!(out, "Nothing to confirm.")?,
                    }
                    self.show_today(&mut out)?;
                }
                "redo" => {
                    let result = self.model.redo_decision();
                    if report(&mut out, result)?.is_none() {
                        writeln!(out, "Nothing to redo.")?;
                    }
                    self.show_today(&mut out)?;
                }
                "add" => {
                    let result = self.model.add_item(rest);
                    match report(&mut out, result)? {
                        Some(Event::ItemAdded { item, index, .. }) => {
                            writeln!(out, "Added {index}: {item}")?
                        }
                        Some(_) => {}
                        None => writeln!(out, "Ignored blank item.")?,
                    }
                }
                "remove" => match parse_indices(rest) {
                    Ok(indices) => {
                        let result = self.model.remove_items(&indices);
                        if let Some(Event::ItemsRemoved { removed, .. }) = report(&mut out, result)? {
                            writeln!(out, "Removed: {}", removed.join(", "))?;
                        }
                        writeln!(out, "{}", render::item_list(self.model.items()))?;
                    }
                    Err(message) => writeln!(out, "error: {message}")?,
                },
                "list" => writeln!(out, "{}", render::item_list(self.model.items()))?,
                "status" => self.show_today(&mut out)?,
                "help" => writeln!(out, "{HELP}")?,
                "quit" | "exit" => break,
                other => writeln!(out, "unknown command: {other} (type `help`)")?,
            }
            prompt(&mut out)?;
        }
        Ok(())
    }

    /// A session left open past midnight behaves like an app resumed on a new day.
    fn resume_if_new_day<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let today = self.model.clock().today();
        if today == self.day {
            return Ok(());
        }
        self.day = today;
        let result = self.model.reset_daily_state_if_stale();
        if report(out, result)?.is_some() {
            writeln!(out, "A new day has started.")?;
        }
        Ok(())
    }

    fn show_today<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", render::today(self.model.snapshot(), &self.model.level()))
    }

    fn animate_spin<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let items = self.model.items();
        if items.is_empty() || self.model.decided_item().is_some() {
            return Ok(());
        }
        for frame in 0..SPIN_FRAMES {
            let shown = &items[(frame * 7 + frame / 2) % items.len()];
            write!(out, "\r  {shown:<30}")?;
            out.flush()?;
            std::thread::sleep(FRAME_DELAY);
        }
        writeln!(out, "\r{:<32}", "")
    }
}

fn prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}

/// Print a model error and keep the session going.
fn report<W: Write>(
    out: &mut W,
    result: Result<Option<Event>, CoreError>,
) -> io::Result<Option<Event>> {
    match result {
        Ok(event) => Ok(event),
        Err(e) => {
            report_error(out, &e)?;
            Ok(None)
        }
    }
}

fn report_error<W: Write>(out: &mut W, e: &CoreError) -> io::Result<()> {
    tracing::warn!(error = %e, "operation failed");
    writeln!(out, "error: {e}")
}

fn parse_indices(text: &str) -> Result<Vec<usize>, String> {
    let indices = text
        .split_whitespace()
        .map(|part| {
            part.parse::<usize>()
                .map_err(|_| format!("not an index: {part}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if indices.is_empty() {
        return Err("usage: remove <index>...".to_string());
    }
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use roulette_core::{DailyState, ManualClock, MemoryStore, PreferenceBatch, StoreError};
    use std::cell::Cell;
    use std::rc::Rc;

    fn model(clock: &ManualClock, items: &[&str]) -> DecisionModel<MemoryStore, ManualClock> {
        let items = items.iter().map(|s| s.to_string()).collect();
        DecisionModel::load_with(MemoryStore::new(), clock.clone(), items)
            .unwrap()
            .with_seed(3)
    }

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap())
    }

    fn play(model: &mut DecisionModel<MemoryStore, ManualClock>, input: &str) -> String {
        let mut out = Vec::new();
        Session::new(model, false)
            .run(input.as_bytes(), &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn spin_and_confirm_in_one_session() {
        let clock = clock();
        let mut model = model(&clock, &["Soup"]);
        let out = play(&mut model, "spin\nconfirm\nquit\n");

        assert!(out.contains("Today's decision is:\n  Soup"));
        assert!(out.contains("Mission complete!"));
        assert_eq!(model.points(), 10);
        assert_eq!(model.streak_count(), 1);
        assert_eq!(model.daily_state(), DailyState::Completed);
    }

    #[test]
    fn noops_explain_themselves() {
        let clock = clock();
        let mut model = model(&clock, &[]);
        let out = play(&mut model, "spin\nconfirm\nredo\nadd   \n");
        assert!(out.contains("No items to spin."));
        assert!(out.contains("Nothing to confirm."));
        assert!(out.contains("Nothing to redo."));
        assert!(out.contains("Ignored blank item."));
    }

    #[test]
    fn item_management() {
        let clock = clock();
        let mut model = model(&clock, &["A", "B"]);
        let out = play(&mut model, "add Bibimbap\nremove 0\nremove 9\nremove x\n");
        assert!(out.contains("Added 2: Bibimbap"));
        assert!(out.contains("Removed: A"));
        assert!(out.contains("error: Validation error: Index 9 out of bounds"));
        assert!(out.contains("error: not an index: x"));
        assert_eq!(model.items(), ["B".to_string(), "Bibimbap".to_string()]);
    }

    #[test]
    fn new_day_resets_open_session() {
        let clock = clock();
        let mut model = model(&clock, &["Soup"]);
        let mut session = Session::new(&mut model, false);
        let mut out = Vec::new();
        session.run("spin\nconfirm\n".as_bytes(), &mut out).unwrap();

        clock.advance_days(1);
        session.run("status\n".as_bytes(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("A new day has started."));
        assert_eq!(model.daily_state(), DailyState::ReadyToSpin);
        assert_eq!(model.streak_count(), 1);
    }

    #[test]
    fn unknown_command_points_to_help() {
        let clock = clock();
        let mut model = model(&clock, &["A"]);
        let out = play(&mut model, "dance\nhelp\n");
        assert!(out.contains("unknown command: dance"));
        assert!(out.contains("confirm         mark it done"));
    }

    struct FlakyStore {
        inner: MemoryStore,
        locked: Rc<Cell<bool>>,
    }

    impl PreferenceStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn write_batch(&mut self, batch: &PreferenceBatch) -> Result<(), StoreError> {
            if self.locked.get() {
                return Err(StoreError::Locked);
            }
            self.inner.write_batch(batch)
        }
    }

    #[test]
    fn failed_spin_reports_only_the_error() {
        let locked = Rc::new(Cell::new(false));
        let store = FlakyStore {
            inner: MemoryStore::new(),
            locked: Rc::clone(&locked),
        };
        let mut model =
            DecisionModel::load_with(store, clock(), vec!["Soup".to_string()]).unwrap();

        locked.set(true);
        let mut out = Vec::new();
        Session::new(&mut model, false)
            .run("spin\n".as_bytes(), &mut out)
            .unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("error: Store error: Store is locked"));
        assert!(!out.contains("already made"));
        assert!(!out.contains("No items to spin"));
    }
}
