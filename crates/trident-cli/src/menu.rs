//! Interactive main menu.
//!
//! Reads choices and artifact paths line by line; Tier 2 is only prompted for
//! once Tier 1 has passed. End of input leaves the menu.

use crate::app::App;
use crate::report;
use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use trident_core::Verification;

enum Flow {
    Continue,
    Quit,
}

pub fn run<R: BufRead, W: Write>(app: &mut App, mut input: R, mut out: W) -> Result<()> {
    loop {
        report::menu(&mut out)?;
        let Some(choice) = prompt(&mut input, &mut out, "\nSelect an option (1-4): ")? else {
            break;
        };

        let flow = match choice.as_str() {
            "1" => match authenticate(app, &mut input, &mut out) {
                Ok(Flow::Quit) => Flow::Quit,
                Ok(Flow::Continue) => pause(&mut input, &mut out)?,
                Err(e) => {
                    tracing::error!(error = %e, "authentication aborted");
                    writeln!(out, "\nError during authentication: {e:#}")?;
                    pause(&mut input, &mut out)?
                }
            },
            "2" => {
                report::unauthorized(&mut out)?;
                pause(&mut input, &mut out)?
            }
            "3" => {
                report::system_info(&mut out, &app.system_info())?;
                pause(&mut input, &mut out)?
            }
            "4" => {
                writeln!(out, "\nThank you for using the Trident authentication system!")?;
                writeln!(out, "Goodbye!\n")?;
                Flow::Quit
            }
            other => {
                tracing::debug!(choice = other, "invalid menu choice");
                writeln!(out, "\nInvalid option. Please try again.")?;
                Flow::Continue
            }
        };

        if let Flow::Quit = flow {
            break;
        }
    }
    Ok(())
}

/// Walk the three tiers, prompting for each artifact as it is needed.
fn authenticate<R: BufRead, W: Write>(app: &mut App, input: &mut R, out: &mut W) -> Result<Flow> {
    report::banner(out, "STARTING AUTHENTICATION SEQUENCE")?;

    let Some(face) = prompt(input, out, "\nEnter path to your face image: ")? else {
        return Ok(Flow::Quit);
    };
    let face = PathBuf::from(face);
    let verdict = app.sequencer.run_stage1(&face)?;
    report::stage1(out, &face, &verdict)?;
    let Verification::Accepted { identity, .. } = verdict else {
        report::failed(out, 1)?;
        return Ok(Flow::Continue);
    };

    let Some(voice) = prompt(input, out, "\nEnter path to your voice recording: ")? else {
        return Ok(Flow::Quit);
    };
    let voice = PathBuf::from(voice);
    let verdict = app.sequencer.run_stage2(&voice, &identity)?;
    report::stage2(out, &voice, &verdict)?;
    if !verdict.is_accepted() {
        report::failed(out, 2)?;
        return Ok(Flow::Continue);
    }

    let outcome = app.sequencer.run_stage3(&identity)?;
    report::stage3(out, &identity, &outcome)?;
    report::complete(out, &identity)?;
    Ok(Flow::Continue)
}

fn pause<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Flow> {
    Ok(match prompt(input, out, "\nPress Enter to continue...")? {
        Some(_) => Flow::Continue,
        None => Flow::Quit,
    })
}

/// Print `message` and read one trimmed line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> Result<Option<String>> {
    write!(out, "{message}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
