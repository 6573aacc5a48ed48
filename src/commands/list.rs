//! Command: list the install steps.
use crate::tasks::{self, Task};

/// One line per step: position, id, severity, and name.
#[must_use]
pub fn lines(steps: &[Box<dyn Task>]) -> Vec<String> {
    let width = steps.iter().map(|t| t.id().len()).max().unwrap_or(0);
    steps
        .iter()
        .enumerate()
        .map(|(i, t)| {
            format!(
                "{:>2}. {:<width$}  {:<9}  {}",
                i + 1,
                t.id(),
                t.severity(),
                t.name()
            )
        })
        .collect()
}

/// Print the ordered install steps to stdout.
pub fn run() {
    for line in lines(&tasks::all_install_tasks()) {
        println!("{line}");
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn one_line_per_step_in_order() {
        let steps = tasks::all_install_tasks();
        let lines = lines(&steps);
        assert_eq!(lines.len(), steps.len());
        assert!(lines[0].starts_with(" 1. xcode"));
        assert!(lines[0].contains("fatal"));
        assert!(lines[0].ends_with("Install Xcode Command Line Tools"));
        assert!(lines[1].contains("tolerated"));
    }
}
