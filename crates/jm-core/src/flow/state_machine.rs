//! Screen-flow state machine.
//!
//! Defines a pure state transition function for the onboarding and
//! registration flow.

use crate::draft::{ResetDraft, SignupDraft};
use crate::flow::{FlowAction, FlowEvent};
use crate::role::Role;
use crate::screen::Screen;

/// Pure flow state machine.
///
/// 纯状态机：不包含副作用。
pub struct FlowStateMachine;

impl FlowStateMachine {
    /// Computes the next screen and the side-effects to run.
    ///
    /// Total over `(screen, event)`: pairs without a transition return the
    /// screen unchanged and no actions. `role` is the session role before
    /// the event is applied.
    pub fn transition(
        screen: Screen,
        event: FlowEvent,
        role: Option<Role>,
    ) -> (Screen, Vec<FlowAction>) {
        match (screen, event) {
            (_, FlowEvent::LogoutRequested) => (Screen::Home, vec![FlowAction::SignOut]),

            // ===== Home =====
            (Screen::Home, FlowEvent::RequestLogin) => (Screen::Login, Vec::new()),
            (Screen::Home, FlowEvent::RequestSignup) => (Screen::SignUp, Vec::new()),

            // ===== Sign-up =====
            (
                Screen::SignUp,
                FlowEvent::SignupSucceeded {
                    role,
                    method,
                    contact,
                    password,
                    identity_id,
                },
            ) => {
                let next = match method {
                    crate::draft::ContactMethod::Email => Screen::VerifyEmail,
                    crate::draft::ContactMethod::Phone => Screen::VerifySignup,
                };
                let mut actions = vec![
                    FlowAction::SetRole(role),
                    FlowAction::StoreSignupDraft(SignupDraft {
                        method,
                        contact,
                        password,
                    }),
                ];
                // A marker left by an earlier sign-up must not outlive it.
                actions.push(match identity_id {
                    Some(identity_id) => FlowAction::RememberPendingIdentity(identity_id),
                    None => FlowAction::ClearPendingIdentity,
                });
                (next, actions)
            }
            (Screen::VerifySignup | Screen::VerifyEmail, FlowEvent::Verified) => match role {
                Some(role) => (Screen::registration_start(role), Vec::new()),
                None => Self::ignore(screen, "Verified"),
            },

            // ===== Login / password reset =====
            (Screen::Login, FlowEvent::RequestForgotPassword) => {
                (Screen::ForgotPassword, Vec::new())
            }
            (Screen::ForgotPassword, FlowEvent::CodeSent { method, contact }) => (
                Screen::ResetPassword,
                vec![FlowAction::StoreResetDraft(ResetDraft { method, contact })],
            ),
            (Screen::ResetPassword, FlowEvent::ResetSucceeded) => (Screen::Login, Vec::new()),
            (
                Screen::Login,
                FlowEvent::LoginSucceeded {
                    role,
                    profile_complete,
                    display_name,
                },
            ) => (
                Screen::Dashboard,
                vec![FlowAction::EstablishSession {
                    role,
                    display_name,
                    profile_complete,
                }],
            ),

            // ===== Registration wizards =====
            (current, FlowEvent::StepComplete { fields }) => {
                match (current.registration_step(), current.next_registration_step()) {
                    (Some((wizard, _)), Some(next)) => (
                        next,
                        vec![FlowAction::MergeRegistration {
                            role: wizard,
                            fields,
                        }],
                    ),
                    _ => Self::ignore(current, "StepComplete"),
                }
            }
            (current, FlowEvent::Submitted { fields }) if current.is_final_registration_step() => {
                match current.registration_step() {
                    Some((wizard, _)) => (
                        Screen::Dashboard,
                        vec![
                            FlowAction::MergeRegistration {
                                role: wizard,
                                fields,
                            },
                            FlowAction::SubmitRegistration { role: wizard },
                            FlowAction::MarkProfileComplete,
                            FlowAction::ClearPendingIdentity,
                        ],
                    ),
                    None => Self::ignore(current, "Submitted"),
                }
            }
            (current, FlowEvent::Skipped) => match current.registration_step() {
                Some((wizard, _)) => (
                    Screen::Dashboard,
                    vec![FlowAction::DiscardRegistration { role: wizard }],
                ),
                None => Self::ignore(current, "Skipped"),
            },

            // ===== Back =====
            (current, FlowEvent::Back) => match current.predecessor() {
                Some(previous) => (previous, Vec::new()),
                None => Self::ignore(current, "Back"),
            },

            (current, event) => Self::ignore(current, event.name()),
        }
    }

    fn ignore(screen: Screen, event: &str) -> (Screen, Vec<FlowAction>) {
        #[cfg(feature = "tracing")]
        tracing::debug!(%screen, event, "event has no transition on this screen");
        #[cfg(not(feature = "tracing"))]
        let _ = event;
        (screen, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::ContactMethod;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> crate::draft::RegistrationFields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn home_routes_to_login_and_signup() {
        let (next, actions) = FlowStateMachine::transition(Screen::Home, FlowEvent::RequestLogin, None);
        assert_eq!(next, Screen::Login);
        assert!(actions.is_empty());

        let (next, _) = FlowStateMachine::transition(Screen::Home, FlowEvent::RequestSignup, None);
        assert_eq!(next, Screen::SignUp);
    }

    #[test]
    fn phone_signup_goes_to_verify_signup_with_draft() {
        let event = FlowEvent::SignupSucceeded {
            role: Role::Worker,
            method: ContactMethod::Phone,
            contact: "9800000000".into(),
            password: Some("secret123".into()),
            identity_id: None,
        };
        let (next, actions) = FlowStateMachine::transition(Screen::SignUp, event, None);

        assert_eq!(next, Screen::VerifySignup);
        assert_eq!(
            actions,
            vec![
                FlowAction::SetRole(Role::Worker),
                FlowAction::StoreSignupDraft(SignupDraft {
                    method: ContactMethod::Phone,
                    contact: "9800000000".into(),
                    password: Some("secret123".into()),
                }),
                FlowAction::ClearPendingIdentity,
            ]
        );
    }

    #[test]
    fn email_signup_goes_to_verify_email_and_remembers_identity() {
        let event = FlowEvent::SignupSucceeded {
            role: Role::Employer,
            method: ContactMethod::Email,
            contact: "hire@example.com".into(),
            password: None,
            identity_id: Some("uid-1".into()),
        };
        let (next, actions) = FlowStateMachine::transition(Screen::SignUp, event, None);

        assert_eq!(next, Screen::VerifyEmail);
        assert!(actions.contains(&FlowAction::RememberPendingIdentity("uid-1".into())));
        assert!(!actions.contains(&FlowAction::ClearPendingIdentity));
    }

    #[test]
    fn verified_branches_on_role() {
        let (next, _) =
            FlowStateMachine::transition(Screen::VerifySignup, FlowEvent::Verified, Some(Role::Worker));
        assert_eq!(next, Screen::WorkerReg1);

        let (next, _) = FlowStateMachine::transition(
            Screen::VerifyEmail,
            FlowEvent::Verified,
            Some(Role::Employer),
        );
        assert_eq!(next, Screen::EmployerReg1);
    }

    #[test]
    fn verified_without_role_is_ignored() {
        let (next, actions) =
            FlowStateMachine::transition(Screen::VerifyEmail, FlowEvent::Verified, None);
        assert_eq!(next, Screen::VerifyEmail);
        assert!(actions.is_empty());
    }

    #[test]
    fn password_reset_round_trip_returns_to_login() {
        let (next, _) =
            FlowStateMachine::transition(Screen::Login, FlowEvent::RequestForgotPassword, None);
        assert_eq!(next, Screen::ForgotPassword);

        let (next, actions) = FlowStateMachine::transition(
            next,
            FlowEvent::CodeSent {
                method: ContactMethod::Email,
                contact: "ram@example.com".into(),
            },
            None,
        );
        assert_eq!(next, Screen::ResetPassword);
        assert_eq!(
            actions,
            vec![FlowAction::StoreResetDraft(ResetDraft {
                method: ContactMethod::Email,
                contact: "ram@example.com".into(),
            })]
        );

        let (next, _) = FlowStateMachine::transition(next, FlowEvent::ResetSucceeded, None);
        assert_eq!(next, Screen::Login);
    }

    #[test]
    fn login_success_lands_on_dashboard() {
        let (next, actions) = FlowStateMachine::transition(
            Screen::Login,
            FlowEvent::LoginSucceeded {
                role: Role::Employer,
                profile_complete: false,
                display_name: "Sita".into(),
            },
            None,
        );
        assert_eq!(next, Screen::Dashboard);
        assert_eq!(
            actions,
            vec![FlowAction::EstablishSession {
                role: Role::Employer,
                display_name: "Sita".into(),
                profile_complete: false,
            }]
        );
    }

    #[test]
    fn step_complete_advances_and_merges() {
        let (next, actions) = FlowStateMachine::transition(
            Screen::WorkerReg3,
            FlowEvent::StepComplete {
                fields: fields(json!({ "skills": ["Plumber", "Electrician"] })),
            },
            Some(Role::Worker),
        );
        assert_eq!(next, Screen::WorkerReg4);
        assert!(matches!(
            actions.as_slice(),
            [FlowAction::MergeRegistration { role: Role::Worker, .. }]
        ));
    }

    #[test]
    fn step_complete_on_last_step_is_ignored() {
        let (next, actions) = FlowStateMachine::transition(
            Screen::EmployerReg3,
            FlowEvent::StepComplete {
                fields: fields(json!({ "x": 1 })),
            },
            Some(Role::Employer),
        );
        assert_eq!(next, Screen::EmployerReg3);
        assert!(actions.is_empty());
    }

    #[test]
    fn submit_on_final_step_completes_profile() {
        let (next, actions) = FlowStateMachine::transition(
            Screen::EmployerReg3,
            FlowEvent::Submitted {
                fields: fields(json!({ "company": "Acme" })),
            },
            Some(Role::Employer),
        );
        assert_eq!(next, Screen::Dashboard);
        assert_eq!(actions.len(), 4);
        assert_eq!(actions[1], FlowAction::SubmitRegistration { role: Role::Employer });
        assert_eq!(actions[2], FlowAction::MarkProfileComplete);
        assert_eq!(actions[3], FlowAction::ClearPendingIdentity);
    }

    #[test]
    fn submit_before_final_step_is_ignored() {
        let (next, actions) = FlowStateMachine::transition(
            Screen::WorkerReg2,
            FlowEvent::Submitted {
                fields: Default::default(),
            },
            Some(Role::Worker),
        );
        assert_eq!(next, Screen::WorkerReg2);
        assert!(actions.is_empty());
    }

    #[test]
    fn skip_discards_draft_from_any_wizard_step() {
        let (next, actions) =
            FlowStateMachine::transition(Screen::WorkerReg2, FlowEvent::Skipped, Some(Role::Worker));
        assert_eq!(next, Screen::Dashboard);
        assert_eq!(actions, vec![FlowAction::DiscardRegistration { role: Role::Worker }]);

        let (next, actions) = FlowStateMachine::transition(Screen::Login, FlowEvent::Skipped, None);
        assert_eq!(next, Screen::Login);
        assert!(actions.is_empty());
    }

    #[test]
    fn back_never_produces_actions() {
        for screen in Screen::ALL {
            let (next, actions) =
                FlowStateMachine::transition(screen, FlowEvent::Back, Some(Role::Worker));
            assert!(actions.is_empty(), "back on {screen} produced actions");
            assert_eq!(next, screen.predecessor().unwrap_or(screen));
        }
    }

    #[test]
    fn logout_from_anywhere_returns_home() {
        for screen in Screen::ALL {
            let (next, actions) =
                FlowStateMachine::transition(screen, FlowEvent::LogoutRequested, Some(Role::Employer));
            assert_eq!(next, Screen::Home);
            assert_eq!(actions, vec![FlowAction::SignOut]);
        }
    }

    #[test]
    fn unrelated_events_leave_screen_unchanged() {
        let (next, actions) =
            FlowStateMachine::transition(Screen::Dashboard, FlowEvent::RequestLogin, Some(Role::Worker));
        assert_eq!(next, Screen::Dashboard);
        assert!(actions.is_empty());
    }
}
