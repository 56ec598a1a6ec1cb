use colored::Colorize;
use tc::format_address;

use crate::error::Result;
use crate::state::{StatePaths, load_connection};

pub fn execute(paths: &StatePaths) -> Result<()> {
	match load_connection(paths)? {
		Some(session) => {
			println!("{} {}", "Connected".green().bold(), format_address(&session.address));
			println!("  {} {}", "address".dimmed(), session.address);
			println!("  {} {}", "chain".dimmed(), session.chain);
			println!("  {} {}", "topic".dimmed(), session.topic);
		}
		None => println!("Not connected"),
	}
	Ok(())
}
