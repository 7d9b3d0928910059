//! `cachet apply`: run requested coordinates through the resolve pipeline.

use console::style;
use miette::Result;

use cachet_core::notation::ModuleNotation;
use cachet_resolver::conflict::ConflictReport;
use cachet_resolver::ResolutionStrategy;

pub fn exec(strategy: &ResolutionStrategy, coordinates: &[String]) -> Result<()> {
    let requested = coordinates
        .iter()
        .map(|c| ModuleNotation::from(c.as_str()).to_selector())
        .collect::<Result<Vec<_>, _>>()?;
    let action = strategy.dependency_resolve_action();

    let mut targets = Vec::with_capacity(requested.len());
    for selector in &requested {
        let target = action.apply(selector)?;
        if &target == selector {
            println!("{selector}");
        } else {
            println!("{selector} {} {}", style("->").dim(), style(&target).cyan());
        }
        targets.push(target);
    }

    let report = ConflictReport::from_requests(&targets);
    if !report.is_empty() {
        eprint!("{}", style(&report).yellow());
    }
    strategy.conflict_resolution().enforce(&report)
}
