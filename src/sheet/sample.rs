//! Built-in sample dataset served by the demo endpoint.

use super::grid::Grid;

const HEADERS: [&str; 10] = [
    "ID",
    "Name",
    "Email",
    "Department",
    "Salary",
    "Join Date",
    "Status",
    "Location",
    "Manager",
    "Skills",
];

const ROWS: [[&str; 10]; 5] = [
    [
        "001",
        "John Doe",
        "john.doe@example.com",
        "Engineering",
        "$75,000",
        "2023-01-15",
        "Active",
        "New York",
        "Alice Johnson",
        "JavaScript, Python, React",
    ],
    [
        "002",
        "Jane Smith",
        "jane.smith@example.com",
        "Marketing",
        "$68,000",
        "2023-03-22",
        "Active",
        "San Francisco",
        "Bob Wilson",
        "SEO, Content Marketing, Analytics",
    ],
    [
        "003",
        "Mike Johnson",
        "mike.johnson@example.com",
        "Sales",
        "$72,000",
        "2022-11-08",
        "Active",
        "Chicago",
        "Carol Davis",
        "CRM, Lead Generation, Negotiation",
    ],
    [
        "004",
        "Sarah Williams",
        "sarah.williams@example.com",
        "HR",
        "$65,000",
        "2023-02-14",
        "Active",
        "Austin",
        "David Brown",
        "Recruiting, Training, Compliance",
    ],
    [
        "005",
        "David Brown",
        "david.brown@example.com",
        "Engineering",
        "$82,000",
        "2022-09-30",
        "Active",
        "Seattle",
        "Alice Johnson",
        "Node.js, AWS, Docker",
    ],
];

/// Spreadsheet name reported for the sample dataset
pub const SAMPLE_SPREADSHEET: &str = "sample";

/// Tab name reported for the sample dataset
pub const SAMPLE_TAB: &str = "Employees";

/// Header row followed by the sample employee rows
pub fn sample_grid() -> Grid {
    std::iter::once(HEADERS.iter().map(|s| s.to_string()).collect())
        .chain(
            ROWS.iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect()),
        )
        .collect()
}
