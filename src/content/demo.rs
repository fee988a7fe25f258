use crate::ai::Provider;

use super::extract::capitalize;
use super::{process, ProcessedContent};

/// Fixed sample page shown when generation is unavailable. Fully
/// deterministic: the metrics come from running the normal post-processor
/// over the sample body.
pub fn demo_content(topic: &str, niche: Option<&str>, provider: Provider) -> ProcessedContent {
    let topic = match topic.trim() {
        "" => "Your Topic",
        t => t,
    };
    let heading = capitalize(topic);
    let audience = niche
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| format!("people in {}", n))
        .unwrap_or_else(|| "people just like you".to_string());

    let body = format!(
        "# {heading} - Your Complete Success Guide\n\n\
         ## Introduction: Why This Guide Changes Everything\n\n\
         *[This is demo content showing the structure of a generated landing page. Live output \
         is unique copy written for your exact inputs.]*\n\n\
         When I first started exploring {topic}, I had no idea how transformative the journey \
         would become. Like many {audience}, I doubted the strategies I had heard about would \
         work in the real world.\n\n\
         After months of research, testing and implementation, I found a system that \
         consistently delivers results. This guide holds everything I wish I had known on day one.\n\n\
         ## The Problem Most People Face\n\n\
         Most people approaching {topic} make the same mistakes that keep them from their goals:\n\n\
         - Jumping in without a clear strategy or roadmap\n\
         - Following outdated advice that no longer works\n\
         - Giving up before seeing meaningful results\n\n\
         ## The Complete Strategy Framework\n\n\
         ### Step 1: Foundation Building\n\
         Sustainable success with {topic} comes from the right foundation. Most people skip \
         this step and wonder why they struggle later. [AFFILIATE_LINK: Starter Toolkit]\n\n\
         ### Step 2: Advanced Techniques\n\
         Once the basics are in place, these techniques accelerate your progress and help you \
         reach results faster than you thought possible.\n\n\
         ### Step 3: Scaling and Optimization\n\
         This is where most people plateau. Here is how to break through to consistent, \
         long-term success. [AFFILIATE_LINK: Advanced Course]\n\n\
         ## Real Results from Real People\n\n\
         \"This approach transformed my results in just 30 days.\" - Sarah M.\n\n\
         \"I went from struggling to consistent success. The strategies actually work!\" - Mike T.\n\n\
         ## Frequently Asked Questions\n\n\
         **How long until I see results?** Most readers notice progress within the first few \
         weeks when they follow the steps in order.\n\n\
         ## Your Next Steps\n\n\
         Ready to get started? Download the checklist, try the first step today, and sign up \
         for updates so you never miss a new strategy.\n",
        heading = heading,
        topic = topic,
        audience = audience,
    );

    let mut content = process(&body, topic);
    content.title = format!("{} - Complete Guide & Proven Strategies (Demo)", heading);
    content.description = format!(
        "This is demonstration content showing how your landing page would appear. Live \
         generation produces unique content written by {}.",
        provider.label()
    );
    content
}
