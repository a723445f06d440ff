//! Prompt construction for the four engines.
//!
//! The one rule: web-search augmentation is URL-triggered only. A URL input
//! turns search on so the model can inspect the target site; free text never
//! does.

/// A built instruction string plus whether the search tool should be active.
#[derive(Debug)]
pub struct PromptSpec {
    pub text: String,
    pub web_search: bool,
}

/// Source-language hint value meaning "let the model figure it out".
pub const AUTO_DETECT: &str = "Auto Detect";

pub fn modernize(content: &str, source_lang: &str, is_url: bool) -> PromptSpec {
    if is_url {
        PromptSpec {
            text: format!(
                "You are an expert Senior Full Stack Engineer.\n\
                 Analyze the website at this URL: {content}\n\n\
                 Based on the visible structure and typical patterns for this type of site:\n\
                 1. Create a MODERN boilerplate implementation using React (TypeScript) and \
                 Tailwind CSS that replicates the core functionality and design of this site \
                 but with a modern stack.\n\
                 2. In the explanation, describe the likely legacy stack it might be replacing \
                 and why the new stack is better.\n\n\
                 Provide the response in two parts:\n\
                 1. The code block.\n\
                 2. The explanation."
            ),
            web_search: true,
        }
    } else {
        let lang_instruction = if source_lang == AUTO_DETECT {
            "Analyze the code to automatically detect the source language.".to_string()
        } else {
            format!("The source language is {source_lang}.")
        };
        PromptSpec {
            text: format!(
                "You are an expert Senior Full Stack Engineer.\n\
                 {lang_instruction}\n\n\
                 Convert the following legacy code into modern, clean, and secure React \
                 (TypeScript) and/or HTML5/CSS3.\n\n\
                 Legacy Code:\n{content}\n\n\
                 Provide the response in two parts:\n\
                 1. The converted modern code in a single code block.\n\
                 2. A brief explanation of the changes."
            ),
            web_search: false,
        }
    }
}

pub fn audit(content: &str, is_url: bool) -> PromptSpec {
    if is_url {
        PromptSpec {
            text: format!(
                "Perform a comprehensive security and performance audit of the website at: \
                 {content}\n\n\
                 Look for:\n\
                 1. Common vulnerabilities (exposed headers, lack of HTTPS, mixed content).\n\
                 2. UX/UI glitches visible to a user.\n\
                 3. Performance bottlenecks inferred from the site type.\n\n\
                 Return a JSON object with:\n\
                 - \"score\": A number between 0 and 100.\n\
                 - \"report\": A detailed Markdown report."
            ),
            web_search: true,
        }
    } else {
        PromptSpec {
            text: format!(
                "Analyze the following code snippet or system description for security flaws, \
                 glitches, and performance bottlenecks.\n\n\
                 Content:\n{content}\n\n\
                 Return a JSON object with:\n\
                 - \"score\": A number between 0 and 100.\n\
                 - \"report\": A detailed Markdown report."
            ),
            web_search: false,
        }
    }
}

pub fn design(instruction: &str, url: Option<&str>, wants_code: bool) -> PromptSpec {
    let role = if wants_code {
        "You are an expert Frontend Architect and UI Engineer."
    } else {
        "You are a world-class UI/UX Designer."
    };
    let output_instruction = if wants_code {
        "Based on the analysis and vision, generate a complete, production-ready React \
         component (using Tailwind CSS) that implements a significant visual upgrade. \
         Return ONLY the code inside a markdown code block."
    } else {
        "Provide high-impact UI/UX recommendations, critiquing the current site against the \
         user's vision and modern trends (Anti-Gravity, Glassmorphism, Brutalism). Focus on \
         Visual Hierarchy, Accessibility, and User Flow. Format as Markdown."
    };

    match url {
        Some(url) => PromptSpec {
            text: format!(
                "{role}\n\
                 Analyze the website at: {url}\n\n\
                 The user wants to improve it with this specific vision or problem: \
                 \"{instruction}\".\n\n\
                 {output_instruction}"
            ),
            web_search: true,
        },
        None => PromptSpec {
            text: format!(
                "{role}\n\
                 The user wants to design a website with this description: \
                 \"{instruction}\".\n\n\
                 {output_instruction}"
            ),
            web_search: false,
        },
    }
}

pub fn growth(content: &str, is_url: bool) -> PromptSpec {
    if is_url {
        PromptSpec {
            text: format!(
                "You are a Growth Hacker and SEO Expert.\n\
                 Analyze the website at: {content}\n\n\
                 Suggest strategies to increase reach, improve SEO, and drive engagement.\n\
                 Include keyword strategy, content marketing ideas, and technical SEO fixes.\n\n\
                 Format as Markdown."
            ),
            web_search: true,
        }
    } else {
        PromptSpec {
            text: format!(
                "You are a Growth Hacker and SEO Expert.\n\
                 Analyze the following content or business description:\n{content}\n\n\
                 Suggest strategies to increase reach, improve SEO, and drive engagement.\n\
                 Format as Markdown."
            ),
            web_search: false,
        }
    }
}
