//! User-facing console messages.
//! Colored prefixes are used only when stdout is a TTY; log events go through
//! `tracing` instead and never through this module.

use owo_colors::OwoColorize;
use std::io::Write;

#[derive(Clone, Copy)]
enum Tag {
    Info,
    Warn,
    Error,
    Ok,
}

impl Tag {
    fn label(self) -> &'static str {
        match self {
            Tag::Info => "info:",
            Tag::Warn => "warn:",
            Tag::Error => "error:",
            Tag::Ok => "ok:",
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Tag::Warn | Tag::Error)
    }
}

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn emit(tag: Tag, msg: &str) {
    let prefix = if is_tty() {
        match tag {
            Tag::Info => tag.label().cyan().bold().to_string(),
            Tag::Warn => tag.label().yellow().bold().to_string(),
            Tag::Error => tag.label().red().bold().to_string(),
            Tag::Ok => tag.label().green().bold().to_string(),
        }
    } else {
        tag.label().to_string()
    };
    if tag.to_stderr() {
        eprintln!("{prefix} {msg}");
    } else {
        println!("{prefix} {msg}");
    }
}

pub fn print_info(msg: &str) {
    emit(Tag::Info, msg);
}

pub fn print_warn(msg: &str) {
    emit(Tag::Warn, msg);
}

pub fn print_error(msg: &str) {
    emit(Tag::Error, msg);
}

pub fn print_success(msg: &str) {
    emit(Tag::Ok, msg);
}

/// Plain line without prefix. Used for the final summary, which scripts may parse.
pub fn print_user(msg: &str) {
    println!("{msg}");
}

/// Prompt on stdout without a newline, flushed so it appears before stdin is read.
pub fn print_prompt(msg: &str) {
    if is_tty() {
        print!("{} ", msg.bold());
    } else {
        print!("{msg} ");
    }
    let _ = std::io::stdout().flush();
}
