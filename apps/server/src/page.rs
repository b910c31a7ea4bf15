//! HTML rendering. Every function here is pure: all I/O happens before a page is built.

use std::fmt::Write;

use cb_dataset::{ImageId, ItemView};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::app::{item_path, STATIC_IMAGES};

/// How the image of an item can be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asset {
	Available { src: String },
	Unavailable,
}

impl Asset {
	pub fn available(filename: &str) -> Self {
		Self::Available {
			src: format!("{STATIC_IMAGES}/{filename}"),
		}
	}
}

const STYLE: &str = "
      body { margin: 2rem auto; max-width: 960px; font-family: ui-sans-serif, system-ui, -apple-system, Segoe UI, sans-serif; }
      nav { display: flex; justify-content: space-between; margin-bottom: 1rem; }
      nav .disabled { color: #999; }
      figure { margin: 0 0 1.5rem 0; }
      figure img { max-width: 100%; }
      .missing { padding: 4rem; background: #eee; color: #666; text-align: center; }
      table { border-collapse: collapse; width: 100%; }
      th, td { text-align: left; padding: 0.3rem 0.6rem; border-bottom: 1px solid #ddd; vertical-align: top; }
";

pub fn item(view: &ItemView<'_>, asset: &Asset) -> String {
	let id = text(view.id.as_str());

	let figure = match asset {
		Asset::Available { src } => format!(
			r#"<img src="{}" alt="Image {id}" />"#,
			attr(src)
		),
		Asset::Unavailable => {
			r#"<div class="missing">Image unavailable, reload to retry the download.</div>"#
				.to_string()
		}
	};

	let mut humans = String::new();
	for caption in view.references {
		let _ = writeln!(humans, r#"        <li class="human">{}</li>"#, text(caption));
	}
	if view.references.is_empty() {
		humans.push_str("        <li class=\"none\">No reference captions.</li>\n");
	}

	let mut systems = String::new();
	for (system, caption) in view.systems {
		let _ = writeln!(
			systems,
			r#"        <tr class="system"><th>{}</th><td>{}</td></tr>"#,
			text(system),
			text(caption)
		);
	}
	if view.systems.is_empty() {
		systems.push_str("        <tr class=\"none\"><td colspan=\"2\">No system captions.</td></tr>\n");
	}

	format!(
		r##"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Captions for image {id}</title>
    <style>{STYLE}    </style>
  </head>
  <body>
    <nav>
      {previous}
      <span>Image {id}</span>
      {next}
    </nav>
    <figure>
      {figure}
    </figure>
    <section>
      <h2>Human captions</h2>
      <ol>
{humans}      </ol>
    </section>
    <section>
      <h2>System captions</h2>
      <table>
{systems}      </table>
    </section>
  </body>
</html>"##,
		previous = nav_link(view.previous, "previous", "&larr; Previous"),
		next = nav_link(view.next, "next", "Next &rarr;"),
	)
}

fn nav_link(target: Option<&ImageId>, rel: &str, label: &str) -> String {
	match target {
		Some(id) => format!(
			r#"<a rel="{rel}" href="{}">{label}</a>"#,
			attr(&item_path(id))
		),
		None => format!(r#"<span class="disabled">{label}</span>"#),
	}
}

pub fn not_found(message: &str) -> String {
	format!(
		r##"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <title>Not found</title>
    <style>{STYLE}    </style>
  </head>
  <body>
    <h1>404 Not Found</h1>
    <p>{}</p>
    <p><a href="/">Back to the first image</a></p>
  </body>
</html>"##,
		text(message)
	)
}
