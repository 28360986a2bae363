//! Built-in demo accounts, one per role

use chrono::{DateTime, TimeZone, Utc};

use super::user::{
    AdminProfile, ParentProfile, RoleProfile, StudentProfile, TeacherProfile, TechnicianProfile,
    UserBase, UserRecord,
};

fn enrolled_at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 8, 0, 0)
        .single()
        .unwrap_or_default()
}

fn base(
    id: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
    created_at: DateTime<Utc>,
) -> UserBase {
    UserBase {
        id: id.to_string(),
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        created_at,
        last_login: None,
        is_active: true,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The seed accounts
pub fn seed_users() -> Vec<UserRecord> {
    vec![
        UserRecord {
            base: base("1", "eleve@gmail.com", "Lucas", "Martin", enrolled_at(2024, 9, 2)),
            password: "eleve1234".to_string(),
            profile: RoleProfile::Student(StudentProfile {
                grade: "3ème".to_string(),
                class_name: "3ème A".to_string(),
                student_number: "ETU-2024-001".to_string(),
            }),
        },
        UserRecord {
            base: base("2", "parent@gmail.com", "Sophie", "Martin", enrolled_at(2024, 9, 2)),
            password: "parent1234".to_string(),
            profile: RoleProfile::Parent(ParentProfile {
                children: strings(&["1"]),
                phone: Some("06 12 34 56 78".to_string()),
            }),
        },
        UserRecord {
            base: base("3", "prof@gmail.com", "Jean", "Dupont", enrolled_at(2023, 8, 28)),
            password: "prof1234".to_string(),
            profile: RoleProfile::Teacher(TeacherProfile {
                subjects: strings(&["Mathématiques", "Physique-Chimie"]),
                classes: strings(&["3ème A", "4ème B"]),
            }),
        },
        UserRecord {
            base: base("4", "admin@gmail.com", "Marie", "Leroy", enrolled_at(2022, 6, 15)),
            password: "admin1234".to_string(),
            profile: RoleProfile::Admin(AdminProfile {
                permissions: strings(&["users.*", "courses.*", "reports.*", "settings.manage"]),
                department: Some("Administration".to_string()),
            }),
        },
        UserRecord {
            base: base("5", "technicien@gmail.com", "Paul", "Bernard", enrolled_at(2023, 1, 9)),
            password: "tech1234".to_string(),
            profile: RoleProfile::Technician(TechnicianProfile {
                specialization: "Réseaux et infrastructure".to_string(),
                work_groups: strings(&["Maintenance informatique", "Salle multimédia"]),
            }),
        },
    ]
}
