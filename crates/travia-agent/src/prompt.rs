//! Intent-extraction prompt assembly.

use std::fmt::Write;

use travia_core::dates;

use crate::session::ChatMessage;

/// Build the extraction prompt for a query, with resolved relative dates and
/// the trailing `context_messages` history messages as context.
pub fn intent_prompt(query: &str, history: &[ChatMessage], context_messages: usize) -> String {
    let today = dates::today_iso();
    let tomorrow = dates::tomorrow_iso();
    let next_week = dates::next_week_iso();

    let mut context = String::new();
    if !history.is_empty() && context_messages > 0 {
        context.push_str("\n\nPrevious conversation:\n");
        let start = history.len().saturating_sub(context_messages);
        for msg in &history[start..] {
            let _ = writeln!(context, "{}: {}", msg.role, msg.content);
        }
    }

    format!(
        r#"
Extract structured travel intent from the user query.
Use intent=clarify if anything required is missing.
Use intent=follow_up if the user is asking about previous results or making modifications to a previous query.
{context}
**IMPORTANT RULES:**
1. Return all dates in ISO format (YYYY-MM-DD).
   - If the user says "tomorrow", use: {tomorrow}
   - If the user says "today", use: {today}
   - If the user says "next week", use: {next_week}
   - If the user says "in X days/nights", calculate from today ({today}).

2. Field usage by intent type:
   - **flight_search**: origin = departure airport, destination = arrival airport, check_in = departure date
   - **hotel_search**: destination = hotel city code (NOT origin!), check_in = check-in date, check_out = check-out date
   - **both**: origin = departure, destination = arrival/hotel city, check_in = departure/check-in, check_out = check-out
   - **follow_up**: Extract any new parameters while keeping context from previous query

3. For hotel searches, ALWAYS put the city in the "destination" field, NOT "origin".

4. If user query is incomplete or ambiguous, use intent=clarify and explain what's missing in reasoning.

5. Common airport codes: Mumbai=BOM, Delhi=DEL, Bangalore=BLR, Chennai=MAA, Kolkata=CCU

Current Query: {query}
"#
    )
}
