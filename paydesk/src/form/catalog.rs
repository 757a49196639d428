//! Static pick lists offered by the request form

use shared::models::{ClientProjectType, PaymentFrequency};

/// Value/label pair of a select option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub value: &'static str,
    pub label: &'static str,
}

/// Employee known to the salary template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Employee {
    pub value: &'static str,
    pub name: &'static str,
    pub address: &'static str,
    pub position: &'static str,
}

pub const CLIENTS: &[CatalogEntry] = &[
    CatalogEntry { value: "client1", label: "Acme Corporation" },
    CatalogEntry { value: "client2", label: "TechStart Inc" },
    CatalogEntry { value: "client3", label: "Global Solutions Ltd" },
    CatalogEntry { value: "client4", label: "Digital Innovations" },
];

pub const PROJECTS: &[CatalogEntry] = &[
    CatalogEntry { value: "project1", label: "Website Redesign 2024" },
    CatalogEntry { value: "project2", label: "Mobile App Development" },
    CatalogEntry { value: "project3", label: "SEO Campaign Q1" },
    CatalogEntry { value: "project4", label: "Brand Identity Refresh" },
];

pub const EMPLOYEES: &[Employee] = &[
    Employee {
        value: "emp1",
        name: "John Smith",
        address: "123 Main Street, New York, NY 10001",
        position: "Senior Developer",
    },
    Employee {
        value: "emp2",
        name: "Sarah Johnson",
        address: "456 Oak Avenue, Los Angeles, CA 90012",
        position: "Marketing Manager",
    },
    Employee {
        value: "emp3",
        name: "Michael Chen",
        address: "789 Elm Street, Chicago, IL 60601",
        position: "UI/UX Designer",
    },
    Employee {
        value: "emp4",
        name: "Emily Davis",
        address: "321 Pine Road, Houston, TX 77002",
        position: "Content Writer",
    },
    Employee {
        value: "emp5",
        name: "David Wilson",
        address: "654 Maple Drive, Miami, FL 33101",
        position: "SEO Specialist",
    },
];

/// Options for a reference type (`client` or `project`); `other` is free text
pub fn references(kind: ClientProjectType) -> &'static [CatalogEntry] {
    match kind {
        ClientProjectType::Client => CLIENTS,
        ClientProjectType::Project => PROJECTS,
        ClientProjectType::Other => &[],
    }
}

/// Look a reference up by value or label
pub fn find_reference(kind: ClientProjectType, key: &str) -> Option<&'static CatalogEntry> {
    references(kind)
        .iter()
        .find(|e| e.value == key || e.label.eq_ignore_ascii_case(key))
}

/// Look an employee up by value (`emp1`) or name
pub fn find_employee(key: &str) -> Option<&'static Employee> {
    EMPLOYEES
        .iter()
        .find(|e| e.value == key || e.name.eq_ignore_ascii_case(key))
}

/// Accepts the wire name or the label (`one-time`, `One-time`)
pub fn parse_frequency(value: &str) -> Option<PaymentFrequency> {
    PaymentFrequency::ALL
        .into_iter()
        .find(|f| f.as_str() == value || f.label().eq_ignore_ascii_case(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_reference_by_value_or_label() {
        let by_value = find_reference(ClientProjectType::Client, "client2").unwrap();
        assert_eq!(by_value.label, "TechStart Inc");
        let by_label = find_reference(ClientProjectType::Project, "seo campaign q1").unwrap();
        assert_eq!(by_label.value, "project3");
        assert!(find_reference(ClientProjectType::Client, "project1").is_none());
        assert!(find_reference(ClientProjectType::Other, "anything").is_none());
    }

    #[test]
    fn test_find_employee() {
        let emp = find_employee("emp3").unwrap();
        assert_eq!(emp.name, "Michael Chen");
        assert_eq!(emp.position, "UI/UX Designer");
        assert_eq!(find_employee("David Wilson").unwrap().value, "emp5");
        assert!(find_employee("emp9").is_none());
    }

    #[test]
    fn test_parse_frequency() {
        assert_eq!(parse_frequency("one-time"), Some(PaymentFrequency::OneTime));
        assert_eq!(parse_frequency("Annually"), Some(PaymentFrequency::Annually));
        assert_eq!(parse_frequency(""), None);
    }
}
