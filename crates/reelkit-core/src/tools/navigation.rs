use reelkit_llm::{Describe, Property, Schema};
use reelkit_wizard::WizardStep;
use serde::Deserialize;

use crate::session::SessionHandle;
use crate::tool::{Tool, ToolError};
use crate::tools::NoInput;

fn step_names() -> Vec<&'static str> {
    WizardStep::ALL.iter().map(|s| s.name()).collect()
}

fn parse_step(name: &str) -> Result<WizardStep, ToolError> {
    WizardStep::parse(name).ok_or_else(|| {
        ToolError::Failed(format!(
            "unknown step '{name}'; expected one of {}",
            step_names().join(", ")
        ))
    })
}

#[derive(Clone, Deserialize)]
pub struct StepInput {
    pub step: String,
}

impl Describe for StepInput {
    fn describe() -> Schema {
        Schema::Object {
            description: None,
            properties: vec![Property::new(
                "step",
                Schema::string_enum("Wizard step name", &step_names()),
            )],
            required: vec!["step".into()],
        }
    }
}

/// Jump directly to a named wizard step.
#[derive(Clone)]
pub struct GoToStepTool {
    session: SessionHandle,
}

impl GoToStepTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for GoToStepTool {
    type Input = StepInput;

    fn name(&self) -> &str {
        "go_to_step"
    }

    fn description(&self) -> &str {
        "Jump the wizard to the named step."
    }

    async fn call(&self, input: StepInput) -> Result<String, ToolError> {
        let step = parse_step(&input.step)?;
        self.session.store().update(|s| s.go_to_step(step));
        Ok(format!("Now on the {} step.", step.name()))
    }
}

/// Advance to the next wizard step.
#[derive(Clone)]
pub struct NextStepTool {
    session: SessionHandle,
}

impl NextStepTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for NextStepTool {
    type Input = NoInput;

    fn name(&self) -> &str {
        "next_step"
    }

    fn description(&self) -> &str {
        "Move the wizard forward one step. Stays on the last step if already there."
    }

    async fn call(&self, _input: NoInput) -> Result<String, ToolError> {
        let step = self.session.store().update(|s| s.advance_step());
        Ok(format!("Now on the {} step.", step.name()))
    }
}

/// Go back to the previous wizard step.
#[derive(Clone)]
pub struct PreviousStepTool {
    session: SessionHandle,
}

impl PreviousStepTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for PreviousStepTool {
    type Input = NoInput;

    fn name(&self) -> &str {
        "previous_step"
    }

    fn description(&self) -> &str {
        "Move the wizard back one step. Stays on the first step if already there."
    }

    async fn call(&self, _input: NoInput) -> Result<String, ToolError> {
        let step = self.session.store().update(|s| s.retreat_step());
        Ok(format!("Now on the {} step.", step.name()))
    }
}

/// Mark a named step as complete without navigating.
#[derive(Clone)]
pub struct MarkStepCompleteTool {
    session: SessionHandle,
}

impl MarkStepCompleteTool {
    pub(crate) fn new(session: &SessionHandle) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Tool for MarkStepCompleteTool {
    type Input = StepInput;

    fn name(&self) -> &str {
        "mark_step_complete"
    }

    fn description(&self) -> &str {
        "Mark the named step as complete. Does not change the current step."
    }

    async fn call(&self, input: StepInput) -> Result<String, ToolError> {
        let step = parse_step(&input.step)?;
        self.session.store().update(|s| s.mark_step_complete(step));
        Ok(format!("Marked the {} step complete.", step.name()))
    }
}
