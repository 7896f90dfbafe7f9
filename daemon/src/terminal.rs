//! Line-oriented terminal front end for one verification session.
//!
//! Each line is either an id for the current step, an empty line (starts the
//! scan in the biometric step), or one of `back`, `restart`, `quit`.
//!
//! Input keeps being read while a check runs. `back` cancels the check on
//! the spot; anything else is held and handled once the check has finished.

use std::collections::VecDeque;
use std::io::{self, Write};

use idcheck_flow::{FlowError, InFlight, NoticeVariant, RecordLookup, Step, VerificationFlow};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub struct Terminal<L, R, W> {
    flow: VerificationFlow<L>,
    input: tokio::io::Lines<R>,
    out: W,
    /// Lines typed while a check was running.
    held: VecDeque<String>,
    closed: bool,
}

impl<L, R, W> Terminal<L, R, W>
where
    L: RecordLookup + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(flow: VerificationFlow<L>, input: R, out: W) -> Self {
        Self {
            flow,
            input: input.lines(),
            out,
            held: VecDeque::new(),
            closed: false,
        }
    }

    pub fn flow(&self) -> &VerificationFlow<L> {
        &self.flow
    }

    /// Run until `quit` or end of input.
    pub async fn run(&mut self) -> io::Result<()> {
        self.render_step()?;
        while let Some(line) = self.next_line().await? {
            let before = self.flow.session().step();
            let keep_going = self.handle(line.trim()).await?;
            self.render_notices()?;
            if self.flow.session().step() != before {
                self.render_step()?;
            }
            if !keep_going {
                return Ok(());
            }
        }
        writeln!(self.out)?;
        Ok(())
    }

    async fn next_line(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.held.pop_front() {
            return Ok(Some(line));
        }
        if self.closed {
            return Ok(None);
        }
        self.prompt()?;
        self.input.next_line().await
    }

    /// Returns `false` when the session should end.
    async fn handle(&mut self, line: &str) -> io::Result<bool> {
        match line {
            "quit" | "exit" => return Ok(false),
            "back" => {
                if let Err(e) = self.flow.back() {
                    self.report(&e)?;
                }
            }
            "restart" => {
                if let Err(e) = self.flow.restart() {
                    self.report(&e)?;
                }
            }
            _ => {
                if let Some(check) = self.start(line)? {
                    self.wait(check).await?;
                }
            }
        }
        Ok(true)
    }

    fn start(&mut self, line: &str) -> io::Result<Option<InFlight>> {
        let started = match self.flow.session().step() {
            Step::CollectingPrimaryId => {
                writeln!(self.out, "  Verifying...")?;
                self.flow.start_primary(line)
            }
            Step::CollectingSecondaryId => {
                writeln!(self.out, "  Verifying...")?;
                self.flow.start_secondary(line)
            }
            Step::BiometricCheck if line.is_empty() => {
                writeln!(self.out, "  Scanning ({})...", self.flow.confirmer_name())?;
                self.flow.start_confirmation()
            }
            Step::BiometricCheck => {
                writeln!(self.out, "  Press Enter to start the scan, or type 'back'.")?;
                return Ok(None);
            }
            Step::Complete => {
                writeln!(self.out, "  Type 'restart' to verify again, or 'quit'.")?;
                return Ok(None);
            }
        };
        match started {
            Ok(check) => Ok(Some(check)),
            // Recorded failures surface through the notice queue.
            Err(e) if e.is_recorded() => Ok(None),
            Err(e) => {
                self.report(&e)?;
                Ok(None)
            }
        }
    }

    /// Wait for `check` while still reading input.
    async fn wait(&mut self, mut check: InFlight) -> io::Result<()> {
        loop {
            tokio::select! {
                biased;
                done = &mut check => {
                    self.flow.finish(done);
                    return Ok(());
                }
                line = self.input.next_line(), if !self.closed => match line? {
                    Some(line) if line.trim() == "back" => match self.flow.back() {
                        Ok(_) => {
                            writeln!(self.out, "  Cancelled.")?;
                            self.held.clear();
                            return Ok(());
                        }
                        Err(e) => self.report(&e)?,
                    },
                    Some(line) => self.held.push_back(line),
                    None => self.closed = true,
                },
            }
        }
    }

    fn prompt(&mut self) -> io::Result<()> {
        let label = match self.flow.session().step() {
            Step::CollectingPrimaryId => "NIN",
            Step::CollectingSecondaryId => "BVN",
            Step::BiometricCheck => "scan",
            Step::Complete => "done",
        };
        write!(self.out, "{label}> ")?;
        self.out.flush()
    }

    fn render_step(&mut self) -> io::Result<()> {
        let step = self.flow.session().step();
        writeln!(self.out)?;
        writeln!(self.out, "[{:>3}%] {}", step.progress(), step.title())?;
        writeln!(self.out, "       {}", step.description())?;
        if step == Step::CollectingSecondaryId {
            if let Some(record) = self.flow.session().matched_record() {
                writeln!(self.out, "       Record found for {}", record.display_name())?;
            }
        }
        if let Some(summary) = self.flow.session().summary() {
            writeln!(self.out)?;
            writeln!(self.out, "{summary}")?;
        }
        Ok(())
    }

    fn render_notices(&mut self) -> io::Result<()> {
        for notice in self.flow.session_mut().drain_notices() {
            let mark = match notice.variant {
                NoticeVariant::Success => '+',
                NoticeVariant::Destructive => '!',
            };
            writeln!(self.out, "  {mark} {}: {}", notice.title, notice.description)?;
        }
        Ok(())
    }

    fn report(&mut self, error: &FlowError) -> io::Result<()> {
        writeln!(self.out, "  ! {}", error.user_message())
    }
}
