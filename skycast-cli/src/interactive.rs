//! The interactive dashboard: render, ask what to do next, repeat.

use std::fmt;

use chrono::Local;
use inquire::{Select, Text};
use skycast_core::{Session, Tab};

use crate::{
    prompt::{blocking_prompt, is_cancel},
    render::render,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Search,
    Open(Tab),
    Quit,
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuChoice::Search => f.write_str("Get weather"),
            MenuChoice::Open(tab) => f.write_str(tab.label()),
            MenuChoice::Quit => f.write_str("Quit"),
        }
    }
}

/// Menu entries for the current state; "Get location" disappears once used.
fn menu(can_locate: bool) -> Vec<MenuChoice> {
    let mut choices = vec![MenuChoice::Search];
    choices.extend(
        Tab::all()
            .iter()
            .copied()
            .filter(|tab| *tab != Tab::Locate || can_locate)
            .map(MenuChoice::Open),
    );
    choices.push(MenuChoice::Quit);
    choices
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HistoryChoice {
    Entry(String),
    Back,
}

impl fmt::Display for HistoryChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryChoice::Entry(entry) => f.write_str(entry),
            HistoryChoice::Back => f.write_str("← Back"),
        }
    }
}

fn history_menu(entries: &[String]) -> Vec<HistoryChoice> {
    let mut choices: Vec<HistoryChoice> = entries.iter().cloned().map(HistoryChoice::Entry).collect();
    choices.push(HistoryChoice::Back);
    choices
}

pub async fn run(mut session: Session) -> anyhow::Result<()> {
    loop {
        session.apply_ready();
        println!("{}", render(session.state(), Local::now().naive_local()));

        let choices = menu(session.state().can_locate());
        let choice = match blocking_prompt(move || Select::new("What next?", choices).prompt()).await
        {
            Ok(choice) => choice,
            Err(err) if is_cancel(&err) => break,
            Err(err) => return Err(err),
        };

        match choice {
            MenuChoice::Search => {
                let initial = session.state().query().to_string();
                let city = match blocking_prompt(move || {
                    Text::new("Your location:").with_initial_value(&initial).prompt()
                })
                .await
                {
                    Ok(city) => city,
                    Err(err) if is_cancel(&err) => continue,
                    Err(err) => return Err(err),
                };
                session.submit(city);
                session.settle().await;
            }
            MenuChoice::Open(Tab::History) => {
                session.select_tab(Tab::History);
                pick_from_history(&mut session).await?;
            }
            MenuChoice::Open(tab) => {
                session.select_tab(tab);
                session.settle().await;
            }
            MenuChoice::Quit => break,
        }
    }

    Ok(())
}

/// Show the history menu; picking an entry looks it up again.
async fn pick_from_history(session: &mut Session) -> anyhow::Result<()> {
    if session.state().history().is_empty() {
        println!("{}", render(session.state(), Local::now().naive_local()));
        session.close_history();
        return Ok(());
    }

    let options = history_menu(session.state().history().entries());
    let picked = blocking_prompt(move || Select::new("History:", options).prompt()).await;
    session.close_history();

    match picked {
        Ok(HistoryChoice::Entry(entry)) => {
            session.submit(entry);
            session.settle().await;
            Ok(())
        }
        Ok(HistoryChoice::Back) => Ok(()),
        Err(err) if is_cancel(&err) => Ok(()),
        Err(err) => Err(err),
    }
}
