//! HTML blocked page rendering

use handlebars::Handlebars;
use serde::Serialize;

use crate::prelude::*;

/// Template for the blocked page. Values are HTML-escaped by handlebars.
const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
	<meta charset="UTF-8">
	<meta name="viewport" content="width=device-width, initial-scale=1.0">
	<meta name="robots" content="noindex,nofollow">
	<title>{{title}}</title>
	<style>
		body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
			   display: flex; align-items: center; justify-content: center; min-height: 100vh;
			   margin: 0; background: #f5f5f5; color: #333; padding: 1rem; }
		.container { text-align: center; max-width: 600px; padding: 2rem; }
		h1 { font-size: 4rem; margin: 0 0 1rem 0; color: #0073aa; }
		p { font-size: 1.2rem; color: #666; margin: 0.5rem 0; }
		.code { background: #fff; padding: 1rem; border-radius: 4px;
				margin: 1rem 0; font-family: monospace; word-break: break-all; }
		small { color: #999; }
		a { color: #0073aa; text-decoration: none; }
		a:hover { text-decoration: underline; }
	</style>
</head>
<body>
	<div class="container">
		<h1>404</h1>
		<p><strong>{{heading}}</strong></p>
		{{#if description}}
		<p>{{description}}</p>
		{{/if}}
		{{#if api_url}}
		<div class="code">API: {{api_url}}</div>
		{{/if}}
		{{#if admin_url}}
		<p><small>If you are an administrator, visit <a href="{{admin_url}}">the admin UI</a></small></p>
		{{/if}}
	</div>
</body>
</html>
"#;

#[derive(Debug, Serialize)]
pub struct PageParams<'a> {
	pub title: &'a str,
	pub heading: &'a str,
	pub description: &'a str,
	pub api_url: Option<&'a str>,
	pub admin_url: Option<&'a str>,
}

pub struct PageRenderer {
	hb: Handlebars<'static>,
}

impl PageRenderer {
	pub fn new() -> LgResult<Self> {
		let mut hb = Handlebars::new();
		hb.register_template_string("blocked", PAGE_TEMPLATE)
			.map_err(|e| Error::Internal(format!("failed to register page template: {}", e)))?;
		Ok(Self { hb })
	}

	pub fn render(&self, params: &PageParams) -> LgResult<String> {
		self.hb
			.render("blocked", params)
			.map_err(|e| Error::Internal(format!("failed to render blocked page: {}", e)))
	}
}


// vim: ts=4
