//! Markdown rendering of a scanned model.
//!
//! Purely presentational: routes are grouped by controller in first-seen order and every
//! route lists its classified parameters.

use crate::extractor::{ApiModel, Parameter, Route};
use log::debug;

/// Render the model as a Markdown document.
pub fn render_markdown(model: &ApiModel, title: &str, description: &str) -> String {
    debug!("Rendering Markdown for {} routes", model.routes.len());

    let mut out = String::new();
    out.push_str(&format!("# {}\n\n{}\n\n", title, description));

    for (controller, routes) in group_by_controller(&model.routes) {
        out.push_str(&format!("## {}\n\n", controller));
        for route in routes {
            render_route(&mut out, controller, route);
        }
    }

    out
}

/// Routes grouped by controller name (`default` when absent), groups in first-seen order.
pub fn group_by_controller(routes: &[Route]) -> Vec<(&str, Vec<&Route>)> {
    let mut groups: Vec<(&str, Vec<&Route>)> = Vec::new();

    for route in routes {
        let controller = route.controller_or_default();
        match groups.iter_mut().find(|(name, _)| *name == controller) {
            Some((_, members)) => members.push(route),
            None => groups.push((controller, vec![route])),
        }
    }

    groups
}

fn render_route(out: &mut String, controller: &str, route: &Route) {
    out.push_str(&format!("### {} {}\n\n", route.method, route.path));
    out.push_str(&format!("**Controller:** {}\n", controller));
    if !route.file.is_empty() {
        out.push_str(&format!("**File:** {}\n", route.file));
    }
    if let Some(handler) = &route.method_name {
        out.push_str(&format!("**Handler:** {}\n", handler));
    }
    out.push('\n');

    if let Some(params) = &route.parameters {
        if let Some(body) = &params.body {
            out.push_str(&format!("**Request Body:**\n- Type: {}\n\n", body.type_name));
        }
        render_parameter_list(out, "Query Parameters", &params.query);
        render_parameter_list(out, "Path Parameters", &params.params);
        render_parameter_list(out, "Headers", &params.headers);
    }

    out.push_str("---\n\n");
}

fn render_parameter_list(out: &mut String, heading: &str, params: &[Parameter]) {
    if params.is_empty() {
        return;
    }

    out.push_str(&format!("**{}:**\n", heading));
    for param in params {
        out.push_str(&format!(
            "- `{}` ({}){}\n",
            param.display_name(),
            param.type_name,
            if param.required { " - required" } else { "" }
        ));
    }
    out.push('\n');
}
