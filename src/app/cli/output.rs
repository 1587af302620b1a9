use crate::domain::RenderedArtifact;
use crate::services::{ArtifactStatus, DiffView, ReconcileReport};

pub fn print_artifact(artifact: &RenderedArtifact, reveal: bool) {
    println!(
        "==> {} ({}:{} {:04o})",
        artifact.path.display(),
        artifact.owner,
        artifact.group,
        artifact.mode
    );
    if artifact.show_diff || reveal {
        print!("{}", artifact.content);
    } else {
        println!("(content hidden; pass --reveal to print it)");
    }
}

pub fn print_report(report: &ReconcileReport) {
    for outcome in &report.outcomes {
        let path = outcome.path.display();
        match &outcome.status {
            ArtifactStatus::Created { diff } => {
                println!("✅ Created {}", path);
                print_diff(diff);
            }
            ArtifactStatus::Updated { diff } => {
                println!("✅ Updated {}", path);
                print_diff(diff);
            }
            ArtifactStatus::Unchanged => println!("  Unchanged {}", path),
            ArtifactStatus::Failed(err) => println!("❌ Failed {}: {}", path, err),
        }
    }

    let changed = report.changed().count();
    if changed == 0 && report.is_success() {
        println!("✅ All {} artifact(s) already up to date", report.outcomes.len());
    }
}

fn print_diff(diff: &DiffView) {
    match diff {
        DiffView::NoContentChange => println!("  • ownership or mode corrected"),
        DiffView::Suppressed => println!("  • content changed (diff suppressed)"),
        DiffView::Visible(text) => {
            for line in text.lines() {
                println!("    {}", line);
            }
        }
    }
}
