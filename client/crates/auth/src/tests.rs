//! Login and registration scenarios, end to end over a recording transport

#[cfg(test)]
mod login_scenarios {
    use std::sync::Arc;

    use platform::storage::{DurableStorage, MemoryStorage};
    use platform::transport::testing::RecordingTransport;
    use serde_json::json;

    use crate::application::{AuthConfig, SessionStore};
    use crate::domain::gateway::FaceCapture;
    use crate::domain::value_object::role::Role;
    use crate::infra::http::HttpAuthGateway;
    use crate::presentation::{Banner, LoginController, LoginMode, Route};

    type Gateway = HttpAuthGateway<Arc<RecordingTransport>>;

    struct Harness {
        transport: Arc<RecordingTransport>,
        store: SessionStore<Arc<MemoryStorage>>,
        storage: Arc<MemoryStorage>,
        controller: LoginController<Gateway>,
    }

    fn harness() -> Harness {
        let transport = Arc::new(RecordingTransport::new());
        let storage = Arc::new(MemoryStorage::new());
        let mut store = SessionStore::new(storage.clone(), &AuthConfig::default());
        store.initialize();
        let controller = LoginController::new(Arc::new(HttpAuthGateway::new(transport.clone())));
        Harness {
            transport,
            store,
            storage,
            controller,
        }
    }

    fn fill_password(h: &mut Harness) {
        h.controller.password_form.email = "ana@sirona.test".into();
        h.controller.password_form.password = "secreta123".into();
    }

    #[tokio::test]
    async fn test_password_login_without_mfa() {
        let mut h = harness();
        h.transport.respond(
            200,
            json!({"token": "h.p.s", "role": "Paciente", "requires_mfa": false}),
        );
        fill_password(&mut h);

        let target = h.controller.submit_password(&mut h.store).await;

        assert_eq!(target, Some(Route::Home));
        let session = h.store.session();
        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(Role::Paciente));
        assert_eq!(session.user().unwrap().email, "ana@sirona.test");
        assert_eq!(h.storage.get("token").unwrap().as_deref(), Some("h.p.s"));
        assert!(h.controller.password_form.password.is_empty());
    }

    #[tokio::test]
    async fn test_mfa_flow_rejects_then_accepts_code() {
        let mut h = harness();
        h.transport.respond(200, json!({"requires_mfa": true}));
        fill_password(&mut h);

        assert_eq!(h.controller.submit_password(&mut h.store).await, None);
        assert_eq!(h.controller.mode(), LoginMode::Otp);
        assert_eq!(
            h.controller.pending_email().map(|e| e.as_str()),
            Some("ana@sirona.test")
        );
        assert!(!h.store.session().is_authenticated());

        // Wrong code
        h.transport
            .respond(401, json!({"error": "Código OTP inválido o expirado"}));
        h.controller.otp_form.code = "000000".into();
        assert_eq!(h.controller.submit_otp(&mut h.store).await, None);
        assert_eq!(h.controller.mode(), LoginMode::Otp);
        assert_eq!(
            h.controller.banner(),
            Some(&Banner::Error("Código OTP inválido o expirado".into()))
        );
        assert!(!h.store.session().is_authenticated());
        assert!(h.controller.can_submit());

        // Right code
        h.transport
            .respond(200, json!({"token": "h.o.s", "role": "Médico"}));
        h.controller.otp_form.code = "123456".into();
        assert_eq!(h.controller.submit_otp(&mut h.store).await, Some(Route::Home));
        assert!(h.store.session().is_authenticated());
        assert_eq!(h.store.session().role(), Some(Role::Medico));
        assert_eq!(h.controller.pending_email(), None);

        let sent = h.transport.requests();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[2].path, "/api/auth/otp/verify");
    }

    #[tokio::test]
    async fn test_malformed_code_never_reaches_the_api() {
        let mut h = harness();
        h.transport.respond(200, json!({"requires_mfa": true}));
        fill_password(&mut h);
        h.controller.submit_password(&mut h.store).await;

        h.controller.otp_form.code = "12ab".into();
        assert_eq!(h.controller.submit_otp(&mut h.store).await, None);
        assert_eq!(h.controller.field_error().map(|f| f.field), Some("otp"));
        assert_eq!(h.transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_leaving_otp_discards_challenge() {
        let mut h = harness();
        h.transport.respond(200, json!({"requires_mfa": true}));
        fill_password(&mut h);
        h.controller.submit_password(&mut h.store).await;

        h.controller.back_to_credentials();
        assert_eq!(h.controller.mode(), LoginMode::Password);
        assert_eq!(h.controller.pending_email(), None);

        // A stray OTP submit does nothing now
        h.controller.otp_form.code = "123456".into();
        assert_eq!(h.controller.submit_otp(&mut h.store).await, None);
        assert_eq!(h.transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_lockout_disables_submission() {
        let mut h = harness();
        h.transport.respond(
            403,
            json!({"error": "Cuenta bloqueada por múltiples intentos fallidos. Intente de nuevo en 15 minutes",
                   "account_locked": true, "locked_until": "15 minutes"}),
        );
        fill_password(&mut h);

        assert_eq!(h.controller.submit_password(&mut h.store).await, None);
        assert!(h.controller.is_locked());
        assert!(!h.controller.can_submit());
        assert_eq!(
            h.controller.banner(),
            Some(&Banner::Error(
                "Cuenta bloqueada por múltiples intentos fallidos. Intente de nuevo en 15 minutes"
                    .into()
            ))
        );

        // Further submits are ignored without touching the API
        assert_eq!(h.controller.submit_password(&mut h.store).await, None);
        assert_eq!(h.transport.requests().len(), 1);
        assert!(!h.store.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_lockout_without_message_embeds_duration() {
        let mut h = harness();
        h.transport
            .respond(423, json!({"account_locked": true, "locked_until": "15 minutes"}));
        fill_password(&mut h);

        h.controller.submit_password(&mut h.store).await;
        match h.controller.banner() {
            Some(Banner::Error(text)) => assert!(text.contains("15 minutes")),
            other => panic!("expected error banner, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_credentials_show_backend_text() {
        let mut h = harness();
        h.transport
            .respond(401, json!({"message": "Correo o contraseña incorrectos"}));
        fill_password(&mut h);

        assert_eq!(h.controller.submit_password(&mut h.store).await, None);
        assert!(!h.controller.is_locked());
        assert_eq!(
            h.controller.banner(),
            Some(&Banner::Error("Correo o contraseña incorrectos".into()))
        );
        assert_eq!(h.storage.get("token").unwrap(), None);
    }

    #[tokio::test]
    async fn test_bad_email_is_caught_before_request() {
        let mut h = harness();
        h.controller.password_form.email = "ana".into();
        h.controller.password_form.password = "x".into();

        assert_eq!(h.controller.submit_password(&mut h.store).await, None);
        assert_eq!(h.controller.field_error().map(|f| f.field), Some("email"));
        assert!(h.transport.requests().is_empty());
        assert!(!h.controller.is_submitting());
    }

    #[tokio::test]
    async fn test_face_login() {
        let mut h = harness();
        h.transport
            .respond(200, json!({"token": "h.f.s", "role": "Secretario"}));
        h.controller.select_mode(LoginMode::Face);
        h.controller.face_form.email = "recepcion@sirona.test".into();

        // No capture yet
        assert_eq!(h.controller.submit_face(&mut h.store).await, None);
        assert_eq!(h.controller.field_error().map(|f| f.field), Some("face_image"));

        h.controller.face_form.capture = Some(FaceCapture::new(vec![1, 2, 3], "image/png").unwrap());
        assert_eq!(h.controller.submit_face(&mut h.store).await, Some(Route::Home));
        assert_eq!(h.store.session().role(), Some(Role::Secretario));
        assert_eq!(h.transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_otp_mode_cannot_be_selected_directly() {
        let mut h = harness();
        h.controller.select_mode(LoginMode::Otp);
        assert_eq!(h.controller.mode(), LoginMode::Password);
    }

    #[tokio::test]
    async fn test_unreachable_server_shows_generic_message() {
        let mut h = harness();
        h.transport.fail("connection refused");
        fill_password(&mut h);

        h.controller.submit_password(&mut h.store).await;
        match h.controller.banner() {
            Some(Banner::Error(text)) => assert!(!text.contains("refused")),
            other => panic!("expected error banner, got {other:?}"),
        }
        assert!(h.controller.can_submit());
    }
}

#[cfg(test)]
mod registration_scenarios {
    use std::sync::Arc;

    use platform::transport::testing::RecordingTransport;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    use crate::application::{DoctorForm, RegisterUserUseCase};
    use crate::domain::entity::{Session, UserSummary};
    use crate::domain::value_object::{role::Role, token::BearerToken};
    use crate::error::AuthError;
    use crate::infra::http::HttpAuthGateway;

    fn session(role: Role) -> Session {
        let user = UserSummary::new("staff@sirona.test", role, None, None);
        Session::authenticated(user, BearerToken::new("s.t.k"))
    }

    fn form() -> DoctorForm {
        DoctorForm {
            email: "dr.ruiz@sirona.test".into(),
            password: "clave segura 1".into(),
            full_name: "Dr. Mario Ruiz".into(),
            specialty: "Cardiología".into(),
            license_number: "28/123456".into(),
            phone: String::new(),
        }
    }

    fn use_case(transport: &Arc<RecordingTransport>) -> RegisterUserUseCase<HttpAuthGateway<Arc<RecordingTransport>>> {
        RegisterUserUseCase::new(Arc::new(HttpAuthGateway::new(transport.clone())))
    }

    #[tokio::test]
    async fn test_secretary_registers_doctor() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond(201, json!({"email": "dr.ruiz@sirona.test", "role": "Médico"}));

        let created = assert_ok!(
            use_case(&transport)
                .register_doctor(&session(Role::Secretario), &form())
                .await
        );
        assert_eq!(created.role, Role::Medico);
        assert_eq!(
            transport.last_request().unwrap().bearer.as_deref(),
            Some("s.t.k")
        );
    }

    #[tokio::test]
    async fn test_patient_cannot_register_anyone() {
        let transport = Arc::new(RecordingTransport::new());
        let err = assert_err!(
            use_case(&transport)
                .register_doctor(&session(Role::Paciente), &form())
                .await
        );
        assert!(matches!(err, AuthError::Forbidden(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_the_api() {
        let transport = Arc::new(RecordingTransport::new());
        let bad = DoctorForm {
            password: "corto".into(),
            ..form()
        };
        let err = assert_err!(
            use_case(&transport)
                .register_doctor(&session(Role::Administrador), &bad)
                .await
        );
        assert!(matches!(err, AuthError::InvalidField { field: "password", .. }));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond(409, json!({"detail": "El correo ya está registrado"}));

        let err = assert_err!(
            use_case(&transport)
                .register_doctor(&session(Role::Administrador), &form())
                .await
        );
        assert_eq!(err.user_message(), "El correo ya está registrado");
    }
}
