mod common;

use common::{PASSWORD, TestApp};
use pretty_assertions::assert_eq;
use shared::{
    abstract_trait::{AuthServiceTrait, UserServiceTrait},
    domain::requests::{
        ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
        ResetPasswordRequest,
    },
    errors::ServiceError,
    model::Role,
};

fn registration(username: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        full_name: "Alice Nguyen".to_string(),
        email: email.to_string(),
        password: "supersecret".to_string(),
    }
}

fn login(identifier: &str, password: &str) -> LoginRequest {
    LoginRequest {
        username_or_email: identifier.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn register_then_login_by_username_or_email() {
    let app = TestApp::new().await;
    let auth = &app.state.di_container.auth_service;

    let registered = auth
        .register(&registration("alice", "Alice@Example.com"))
        .await
        .unwrap();
    assert_eq!(registered.data.username, "alice");
    assert_eq!(registered.data.role, Role::User);

    let requester = app.state.jwt_config.verify_token(&registered.data.token).unwrap();
    assert_eq!(requester.email, "alice@example.com");

    auth.login(&login("alice", "supersecret")).await.unwrap();
    auth.login(&login("ALICE@example.com", "supersecret"))
        .await
        .unwrap();

    assert!(matches!(
        auth.login(&login("alice", "wrong-password")).await,
        Err(ServiceError::InvalidCredentials)
    ));
    assert!(matches!(
        auth.login(&login("nobody", "supersecret")).await,
        Err(ServiceError::InvalidCredentials)
    ));

    let sent = app.wait_for_emails(1).await;
    assert_eq!(sent[0].subject, "Welcome to Marketplace");
    assert_eq!(sent[0].to, "alice@example.com");
}

#[tokio::test]
async fn duplicate_username_and_email_conflict() {
    let app = TestApp::new().await;
    let auth = &app.state.di_container.auth_service;
    auth.register(&registration("alice", "alice@example.com"))
        .await
        .unwrap();

    match auth.register(&registration("alice", "other@example.com")).await {
        Err(ServiceError::Conflict(msg)) => assert_eq!(msg, "Username already exists"),
        other => panic!("unexpected: {other:?}"),
    }
    match auth.register(&registration("alice2", "ALICE@example.com")).await {
        Err(ServiceError::Conflict(msg)) => assert_eq!(msg, "Email already registered"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn registration_respects_allowed_domain() {
    let app = TestApp::with_domain(Some("hcmut.edu.vn")).await;
    let auth = &app.state.di_container.auth_service;

    assert!(matches!(
        auth.register(&registration("alice", "alice@gmail.com")).await,
        Err(ServiceError::Validation(_))
    ));
    auth.register(&registration("alice", "Alice@HCMUT.edu.vn"))
        .await
        .unwrap();
}

#[tokio::test]
async fn password_reset_flow() {
    let app = TestApp::new().await;
    let user = app.user("bob", Role::User).await;
    let auth = &app.state.di_container.auth_service;

    let unknown = auth
        .forgot_password(&ForgotPasswordRequest {
            email: "ghost@example.com".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(
        unknown.message,
        "If the email is registered, a password reset link has been sent"
    );
    assert!(app.store.reset_token_for(user.user_id).is_none());

    auth.forgot_password(&ForgotPasswordRequest {
        email: user.email.clone(),
    })
    .await
    .unwrap();

    let token = app.store.reset_token_for(user.user_id).unwrap().token;
    assert_eq!(token.len(), 32);

    let sent = app.wait_for_emails(1).await;
    assert_eq!(sent[0].subject, "Reset your password");
    assert_eq!(
        sent[0].data.link,
        format!("http://shop.test/reset-password?token={token}")
    );

    auth.reset_password(&ResetPasswordRequest {
        token: token.clone(),
        new_password: "brand-new-pass".to_string(),
    })
    .await
    .unwrap();

    auth.login(&login("bob", "brand-new-pass")).await.unwrap();
    assert!(matches!(
        auth.login(&login("bob", PASSWORD)).await,
        Err(ServiceError::InvalidCredentials)
    ));

    // Tokens are single use.
    assert!(matches!(
        auth.reset_password(&ResetPasswordRequest {
            token,
            new_password: "another-pass".to_string(),
        })
        .await,
        Err(ServiceError::Validation(_))
    ));
}

#[tokio::test]
async fn expired_reset_token_is_rejected_and_removed() {
    let app = TestApp::new().await;
    let user = app.user("carol", Role::User).await;
    let auth = &app.state.di_container.auth_service;

    auth.forgot_password(&ForgotPasswordRequest {
        email: user.email.clone(),
    })
    .await
    .unwrap();
    let token = app.store.reset_token_for(user.user_id).unwrap().token;
    app.store.expire_reset_token(user.user_id);

    match auth
        .reset_password(&ResetPasswordRequest {
            token,
            new_password: "brand-new-pass".to_string(),
        })
        .await
    {
        Err(ServiceError::Validation(errors)) => {
            assert_eq!(errors, vec!["Invalid or expired reset token".to_string()])
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert!(app.store.reset_token_for(user.user_id).is_none());
}

#[tokio::test]
async fn change_password_needs_the_current_one() {
    let app = TestApp::new().await;
    let user = app.user("dave", Role::User).await;
    let requester = TestApp::requester(&user);
    let users = &app.state.di_container.user_service;

    assert!(matches!(
        users
            .change_password(
                &requester,
                &ChangePasswordRequest {
                    current_password: "not-it".to_string(),
                    new_password: "brand-new-pass".to_string(),
                },
            )
            .await,
        Err(ServiceError::InvalidCredentials)
    ));

    assert!(matches!(
        users
            .change_password(
                &requester,
                &ChangePasswordRequest {
                    current_password: PASSWORD.to_string(),
                    new_password: PASSWORD.to_string(),
                },
            )
            .await,
        Err(ServiceError::Validation(_))
    ));

    users
        .change_password(
            &requester,
            &ChangePasswordRequest {
                current_password: PASSWORD.to_string(),
                new_password: "brand-new-pass".to_string(),
            },
        )
        .await
        .unwrap();

    let profile = users.me(&requester).await.unwrap();
    assert_eq!(profile.data.username, "dave");
}
