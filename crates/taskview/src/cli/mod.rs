/*
[INPUT]:  Parsed CLI subcommands
[OUTPUT]: Non-TUI command implementations (check, init)
[POS]:    CLI module root for the taskview binary
[UPDATE]: When adding CLI subcommands
*/

pub mod check;
pub mod init;
