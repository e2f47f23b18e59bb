//! `kwfilter version-cmp`: prints how two version strings order.

use anyhow::Result;
use std::cmp::Ordering;

use kwfilter_core::compare_versions;

pub fn ordering_symbol(ordering: Ordering) -> &'static str {
    match ordering {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    }
}

pub fn run_version_cmp(left: &str, right: &str) -> Result<()> {
    println!("{}", ordering_symbol(compare_versions(left, right)));
    Ok(())
}
