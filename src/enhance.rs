/// Best-effort post-processing of extracted results.
///
/// Both calls here absorb LLM failures: enhancement falls back to the raw
/// text, simulation falls back to an HTML error snippet. Neither surfaces an
/// error to the HTTP layer.

use crate::adapters::ChatProvider;

const ENHANCE_SYSTEM_PROMPT: &str = "\
You are a helpful assistant that formats search results into a user-friendly, visually appealing format.
Your task is to:
1. Take the raw results from a browser search agent
2. Format them in a clear, organized way
3. Add relevant emojis to make the content more engaging
4. Use HTML formatting for better presentation
5. Make the information easy to scan and understand
6. Maintain all the factual information from the original results

Use <div>, <h3>, <p>, <ul>, <li>, <strong> and other HTML tags to improve readability.
Highlight key information like prices, dates, and important details.";

const SIMULATE_SYSTEM_PROMPT: &str = "\
You are a web browser agent that can execute searches and extract information from the web.
For this task, you'll need to simulate the results without actually browsing the web.

When provided with a search prompt:
1. Explain how you would approach the search task step-by-step
2. Provide realistic, current information as if you browsed the web
3. For flights, prices, or comparisons, generate plausible example data
4. Format your response with HTML and emojis for better presentation
5. Structure your response as if it was real search results

Be honest that these are simulated results. For example, for flights, you can say:
\"Based on typical pricing patterns, here are the likely cheapest flights:\"

Use <div>, <h3>, <p>, <ul>, <li>, <strong> and other HTML tags to improve readability.";

/// Reformat an extracted result into engaging HTML.
/// On any LLM failure the raw text is returned untouched.
pub async fn enhance_result(chat: &dyn ChatProvider, original_prompt: &str, raw_result: &str) -> String {
    let user_content = format!(
        "Original search prompt: {}\n\nRaw results:\n{}\n\n\
         Please format this into a user-friendly display with appropriate emojis and HTML formatting.",
        original_prompt, raw_result
    );

    match chat.complete(ENHANCE_SYSTEM_PROMPT, &user_content).await {
        Ok(enhanced) => enhanced,
        Err(e) => {
            log::error!("Error enhancing result: {}", e);
            raw_result.to_string()
        }
    }
}

/// Fabricate plausible, explicitly-simulated results for restricted hosts
/// where the browser cannot launch. Always returns a displayable payload.
pub async fn simulate_browser_task(chat: &dyn ChatProvider, prompt: &str) -> String {
    let user_content = format!(
        "Execute the following browser agent task and provide realistic results:\n\n{}",
        prompt
    );

    match chat.complete(SIMULATE_SYSTEM_PROMPT, &user_content).await {
        Ok(result) => result,
        Err(e) => {
            log::error!("Error simulating browser task: {}", e);
            format!(
                "<div class='error-message'><p>Sorry, I encountered an error while processing your request: {}</p></div>",
                e
            )
        }
    }
}
