//! Embedded default prompt templates
//!
//! Compiled-in fallbacks; any of these can be overridden by dropping a
//! `{name}.pmt` file into `.planexec/prompts/`.

/// System prompt for the initial planner
pub const PLAN: &str = "\
For the given objective, come up with a simple step by step plan. \
This plan should involve individual tasks, that if executed correctly will yield the correct answer. \
Do not add any superfluous steps. \
The result of the final step should be the final answer. \
Make sure that each step has all the information needed - do not skip steps.

Call submit_plan with the steps in the order they must be done.";

/// System prompt for the replanner
pub const REPLAN_SYSTEM: &str = "\
You are revising the plan for an ongoing task. Decide whether the objective \
is already satisfied by the completed steps, and either respond to the user \
or continue with a revised plan.";

/// User message template for the replanner
pub const REPLAN: &str = "\
For the given objective, come up with a simple step by step plan. \
This plan should involve individual tasks, that if executed correctly will yield the correct answer. \
Do not add any superfluous steps. \
The result of the final step should be the final answer. \
Make sure that each step has all the information needed - do not skip steps.

Your objective was this:
{{{objective}}}

Your original plan was this:
{{{plan}}}

You have currently done the following steps:
{{{past_steps}}}

Update your plan accordingly. If no more steps are needed and you can return \
to the user, call submit_action with a response action. Otherwise call \
submit_action with a plan action that contains only the steps that still \
NEED to be done. Do not return previously done steps as part of the plan.";

/// System prompt for the execution step's reasoning loop
pub const EXECUTOR_SYSTEM: &str = "\
You are a helpful assistant working on one step of a larger plan. \
Use the available tools when they help, then state the outcome of the step \
as plain text.";

/// Task instruction template for the execution step
pub const EXECUTE_STEP: &str = "\
For the following plan:
{{{plan}}}

You are tasked with executing step 1, {{{task}}}.";

/// Get an embedded template by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "plan" => Some(PLAN),
        "replan" => Some(REPLAN),
        "replan-system" => Some(REPLAN_SYSTEM),
        "execute-step" => Some(EXECUTE_STEP),
        "executor-system" => Some(EXECUTOR_SYSTEM),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_present() {
        for name in ["plan", "replan", "replan-system", "execute-step", "executor-system"] {
            assert!(get_embedded(name).is_some(), "missing template: {}", name);
        }
        assert!(get_embedded("nonexistent").is_none());
    }

    #[test]
    fn test_replan_template_has_placeholders() {
        let replan = get_embedded("replan").unwrap();
        assert!(replan.contains("{{{objective}}}"));
        assert!(replan.contains("{{{plan}}}"));
        assert!(replan.contains("{{{past_steps}}}"));
    }
}
