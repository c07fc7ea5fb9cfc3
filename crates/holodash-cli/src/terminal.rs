use std::io::Write;

use holodash_services::{ConnectionStatus, DisplayField, DisplaySurface, RenderedFields};
use tracing::warn;

/// Prints the dashboard line to a writer whenever it changes
pub struct TerminalSurface<W: Write> {
    out: W,
    fields: RenderedFields,
    last_printed: Option<String>,
    host: Option<String>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            fields: RenderedFields::default(),
            last_printed: None,
            host: None,
        }
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            warn!("Failed to write to terminal: {}", e);
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn set_text(&mut self, field: DisplayField, text: &str) {
        self.fields.set(field, text);
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        let line = format!("[{}] {}", status.class(), status.text());
        self.write_line(&line);
    }

    fn set_host(&mut self, host: Option<&str>) {
        let host = host.map(str::to_string);
        if host == self.host {
            return;
        }
        if let Some(name) = &host {
            let line = format!("host: {}", name);
            self.write_line(&line);
        }
        self.host = host;
    }

    fn commit(&mut self) {
        let line = self.fields.summary_line();
        if self.last_printed.as_deref() == Some(line.as_str()) {
            return;
        }
        self.write_line(&line);
        self.last_printed = Some(line);
    }
}
