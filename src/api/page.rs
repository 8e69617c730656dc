use crate::{auth::auth::AuthUser, config::Config, model::role::Role};
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, PartialEq, ToSchema)]
pub struct MenuItem {
    #[schema(value_type = String)]
    pub label: &'static str,
    /// `METHOD path` the client calls for this entry
    pub action: String,
}

/// What the client should render for the current session.
#[derive(Debug, Serialize, PartialEq, ToSchema)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Login {
        #[schema(value_type = String)]
        title: &'static str,
        tabs: Vec<MenuItem>,
    },
    Student {
        greeting: String,
        nim: String,
        jurusan: String,
        menu: Vec<MenuItem>,
    },
    Admin {
        #[schema(value_type = String)]
        title: &'static str,
        username: String,
        menu: Vec<MenuItem>,
    },
}

fn item(label: &'static str, method: &str, path: String) -> MenuItem {
    MenuItem {
        label,
        action: format!("{method} {path}"),
    }
}

/// Picks the view for a session: no role renders login, a role renders its
/// own menu.
pub fn dispatch(session: Option<&AuthUser>, api_prefix: &str) -> View {
    let login = || View::Login {
        title: "Sistem Absensi Mahasiswa (GPS)",
        tabs: vec![
            item("Login Mahasiswa", "POST", "/auth/login/mahasiswa".to_string()),
            item("Login Admin", "POST", "/auth/login/admin".to_string()),
        ],
    };

    let Some(user) = session else {
        return login();
    };

    match (user.role, &user.profile) {
        (Role::Mahasiswa, Some(profile)) => View::Student {
            greeting: format!("Halo, {}", profile.nama),
            nim: profile.nim.clone(),
            jurusan: profile.jurusan.clone(),
            menu: vec![
                item("Dashboard", "GET", format!("{api_prefix}/student/dashboard")),
                item("Absensi", "POST", format!("{api_prefix}/student/attendance")),
                item("Riwayat Absensi", "GET", format!("{api_prefix}/student/attendance")),
                item("Logout", "POST", "/auth/logout".to_string()),
            ],
        },
        (Role::Mahasiswa, None) => login(),
        (Role::Admin, _) => View::Admin {
            title: "Admin Panel",
            username: user.subject.clone(),
            menu: vec![
                item("Data Absensi", "GET", format!("{api_prefix}/admin/attendance")),
                item("Kelola Mahasiswa", "GET", format!("{api_prefix}/admin/students")),
                item("Pengaturan Jam", "GET", format!("{api_prefix}/admin/settings")),
                item("Logout", "POST", "/auth/logout".to_string()),
            ],
        },
    }
}

/// Entry point: the view for whoever is calling
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "View for the current session", body = View)),
    tag = "Page"
)]
pub async fn index(session: Option<AuthUser>, config: web::Data<Config>) -> impl Responder {
    HttpResponse::Ok().json(dispatch(session.as_ref(), &config.api_prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::student::Student;

    fn session(role: Role, profile: Option<Student>) -> AuthUser {
        AuthUser {
            subject: "x".into(),
            role,
            profile,
            jti: "j".into(),
        }
    }

    #[test]
    fn no_session_renders_login() {
        assert!(matches!(dispatch(None, "/api"), View::Login { .. }));
    }

    #[test]
    fn student_session_renders_student_menu() {
        let profile = Student {
            nim: "2201001".into(),
            nama: "Budi".into(),
            jurusan: "TI".into(),
        };
        match dispatch(Some(&session(Role::Mahasiswa, Some(profile))), "/api") {
            View::Student { greeting, nim, menu, .. } => {
                assert_eq!(greeting, "Halo, Budi");
                assert_eq!(nim, "2201001");
                assert_eq!(menu.len(), 4);
                assert_eq!(menu[2].action, "GET /api/student/attendance");
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn student_token_without_profile_falls_back_to_login() {
        assert!(matches!(
            dispatch(Some(&session(Role::Mahasiswa, None)), "/api"),
            View::Login { .. }
        ));
    }

    #[test]
    fn admin_session_renders_admin_menu() {
        match dispatch(Some(&session(Role::Admin, None)), "/v1") {
            View::Admin { menu, .. } => {
                let labels: Vec<_> = menu.iter().map(|m| m.label).collect();
                assert_eq!(labels, ["Data Absensi", "Kelola Mahasiswa", "Pengaturan Jam", "Logout"]);
                assert_eq!(menu[0].action, "GET /v1/admin/attendance");
            }
            other => panic!("unexpected view {other:?}"),
        }
    }
}
