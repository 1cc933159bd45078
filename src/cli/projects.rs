use taxi_petzi::Result;
use taxi_petzi::models::PROJECTS;
use tracing::info;

pub fn execute() -> Result<()> {
    for project in PROJECTS {
        for activity in project.activities {
            info!(
                alias = activity.alias,
                column = activity.id,
                "{} / {}",
                project.name,
                activity.name
            );
        }
    }

    Ok(())
}
