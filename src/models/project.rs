/// A project of the Petzi timesheet, grouping several activities.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: &'static str,
    pub name: &'static str,
    pub activities: &'static [Activity],
}

/// An activity's `id` is the spreadsheet column holding its hours.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: &'static str,
    pub name: &'static str,
    pub alias: &'static str,
}

const fn activity(id: &'static str, name: &'static str, alias: &'static str) -> Activity {
    Activity { id, name, alias }
}

pub const PROJECTS: &[Project] = &[
    Project {
        id: "A",
        name: "Development",
        activities: &[
            activity("E", "Website", "petzi_dev_website"),
            activity("F", "PeliScan", "petzi_dev_peliscan"),
            activity("G", "Other", "petzi_dev_other"),
        ],
    },
    Project {
        id: "B",
        name: "Infra",
        activities: &[activity("O", "Infra", "petzi_infra")],
    },
    Project {
        id: "C",
        name: "Support",
        activities: &[
            activity("V", "1st level", "petzi_sup_1"),
            activity("W", "2nd level", "petzi_sup_2"),
        ],
    },
    Project {
        id: "D",
        name: "Workgroup",
        activities: &[activity("AC", "Workgroup", "petzi_workgroup")],
    },
    Project {
        id: "E",
        name: "Travel",
        activities: &[
            activity("AM", "Meetings", "petzi_travel_meetings"),
            activity("AN", "Other", "petzi_travel_other"),
        ],
    },
    Project {
        id: "F",
        name: "Misc",
        activities: &[
            activity("AS", "Admin", "petzi_misc_admin"),
            activity("AT", "Other", "petzi_misc_other"),
        ],
    },
];

/// Look up the hours column for a project alias.
pub fn column_for_alias(alias: &str) -> Option<&'static str> {
    PROJECTS
        .iter()
        .flat_map(|project| project.activities.iter())
        .find(|activity| activity.alias == alias)
        .map(|activity| activity.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_column_for_alias() {
        assert_eq!(column_for_alias("petzi_dev_website"), Some("E"));
        assert_eq!(column_for_alias("petzi_workgroup"), Some("AC"));
        assert_eq!(column_for_alias("petzi_misc_other"), Some("AT"));
        assert_eq!(column_for_alias("unknown"), None);
    }

    #[test]
    fn test_catalog_aliases_and_columns_unique() {
        let activities: Vec<&Activity> = PROJECTS
            .iter()
            .flat_map(|project| project.activities.iter())
            .collect();

        let aliases: HashSet<_> = activities.iter().map(|a| a.alias).collect();
        let columns: HashSet<_> = activities.iter().map(|a| a.id).collect();

        assert_eq!(activities.len(), 11);
        assert_eq!(aliases.len(), activities.len());
        assert_eq!(columns.len(), activities.len());
    }
}
