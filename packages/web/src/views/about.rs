use dioxus::prelude::*;

#[component]
pub fn About() -> Element {
    rsx! {
        section {
            class: "about",
            h1 { "About StudentHub" }
            p {
                "StudentHub is a project-sharing platform for college students. Teams upload "
                "their academic projects, an administrator reviews them, and approved work "
                "becomes visible to everyone in the college."
            }

            h2 { "Our Mission" }
            p {
                "Keep good student work alive after the semester ends, so the next batch can "
                "learn from it and build on it."
            }

            h2 { "Our Vision" }
            p { "A college where every project starts from what the previous batch finished." }

            h2 { "How We Help" }
            ul {
                li { "A searchable gallery of approved projects, filtered by course and technology." }
                li { "Owner-approved access to project source code." }
                li { "Leaderboards and announcements run by the college administration." }
            }
        }
    }
}
