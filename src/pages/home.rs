use leptos::prelude::*;

use crate::components::project_field::ProjectField;

/// Landing page: the header and the floating project cards.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<ProjectField
				title="Paintoshi"
				subtitle="Things I have built. Drag them around, click to visit."
				title_link="https://paintoshi.dev"
				social_link="https://x.com/paintoshi"
			/>
		</ErrorBoundary>
	}
}
