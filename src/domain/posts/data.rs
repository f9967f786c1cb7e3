use super::StaticPost;

pub static STATIC_POSTS: [StaticPost; 10] = [
    StaticPost {
        id: 1,
        slug: "what-is-seo",
        title: "What Is SEO, Really?",
        excerpt: "Search engine optimisation explained without the jargon: how crawlers see your site and what actually moves rankings.",
        date: "2023-02-14",
        category: "SEO",
        image: "/assets/blog/what-is-seo-card.webp",
        detail_image: "/assets/blog/what-is-seo-hero.webp",
        body: r#"Search engine optimisation is the practice of making a site easy for crawlers to read and worth ranking for people. Strip away the acronyms and it comes down to three things: content that answers a real question, markup that machines can parse, and links that signal trust.

## How crawlers read your site

A crawler fetches your HTML, follows the links it finds, and builds an index of what each page is about. If your headings are decorative divs and your copy lives inside a canvas animation, there is nothing to index. Server-rendered text wins by default.

## What actually moves rankings

- Content that matches search intent, updated when the answer changes.
- Descriptive titles and meta descriptions for every page.
- Internal links between related pages so authority flows through the site.
- Fast pages; slow ones get crawled less and abandoned more.

A periodic seo audit keeps all four honest. Most sites do not need tricks, they need the basics applied consistently for longer than a quarter."#,
    },
    StaticPost {
        id: 2,
        slug: "technical-seo-audit-checklist",
        title: "A Technical SEO Audit Checklist You Can Run Today",
        excerpt: "Twelve checks that surface the crawlability and indexing problems hiding in most marketing sites.",
        date: "2023-03-02",
        category: "SEO",
        image: "/assets/blog/technical-seo-audit-card.webp",
        detail_image: "/assets/blog/technical-seo-audit-hero.webp",
        body: r#"A technical SEO audit answers one question: can a search engine fetch, render, and index every page you care about? Run these checks before spending a cent on content.

## Crawl and indexing

- Fetch `robots.txt` and confirm nothing important is disallowed.
- Compare the sitemap against the pages you actually want indexed.
- Check for redirect chains longer than one hop.
- Look for duplicate pages served under multiple URLs without a canonical tag.

## Rendering

Crawlers execute less JavaScript than you think, and later than you want. View the raw HTML response for your key pages; if the copy is not there, it may as well not exist.

## Performance

Core web vitals are a ranking input and a user-experience truth serum. Measure them on a mid-range phone over 4G, not on your studio workstation."#,
    },
    StaticPost {
        id: 3,
        slug: "modern-web-design-trends",
        title: "Web Design Trends That Will Survive the Year",
        excerpt: "Scroll-driven storytelling, restrained 3D, and typography doing the heavy lifting: the trends worth adopting.",
        date: "2023-04-18",
        category: "Design",
        image: "/assets/blog/design-trends-card.webp",
        detail_image: "/assets/blog/design-trends-hero.webp",
        body: r#"Most web design trends are churn. A few change what clients expect from every site that follows. Here is what we are keeping from this year's crop.

## Scroll as narrative

Scroll-triggered scenes turn a pitch into a story the visitor controls. The trick is restraint: the content must still read with animations disabled, or you have built a presentation, not a website.

## 3D with a budget

Lightweight canvas scenes are now cheap enough to ship on a marketing page. Keep the payload under control and provide a static fallback, because a spinning hero is not worth a ten-second load.

## Typography first

When type carries the hierarchy, you need fewer boxes, borders, and shadows. Pick two faces, commit to a scale, and let whitespace do the layout work."#,
    },
    StaticPost {
        id: 4,
        slug: "brand-identity-guide",
        title: "Building a Brand Identity That Outlives a Rebrand",
        excerpt: "Logos change; identity systems endure. How to document voice, colour, and composition so every channel stays coherent.",
        date: "2023-06-05",
        category: "Branding",
        image: "/assets/blog/brand-identity-card.webp",
        detail_image: "/assets/blog/brand-identity-hero.webp",
        body: r#"A brand identity is the set of decisions that make your output recognisable before anyone reads the name. The logo is the smallest part of it.

## Document the system, not the artefacts

Write down why the palette is what it is, when the secondary face is allowed, and what the photography should never show. Artefacts get redrawn; reasons keep the next designer consistent.

## Voice is identity too

The words on your pricing page are as much brand as the mark in the corner. Define the register: what you say plainly, what you never promise, which jokes you do not make.

## Test against the worst channel

An identity that only works in a case-study deck is decoration. Render it as a favicon, a social avatar, and a one-colour invoice header before calling it done."#,
    },
    StaticPost {
        id: 5,
        slug: "content-marketing-strategy",
        title: "A Content Marketing Strategy for Teams of Three",
        excerpt: "You do not need a newsroom. A small team with a narrow focus beats a big one with a vague mandate.",
        date: "2023-08-21",
        category: "Marketing",
        image: "/assets/blog/content-strategy-card.webp",
        detail_image: "/assets/blog/content-strategy-hero.webp",
        body: r#"Content marketing fails at small companies for one reason: the plan assumes a bigger team. Here is the version that works with three people and four hours a week.

## Pick one question per month

Choose a question your customers actually ask and answer it better than anyone else has. One thorough piece outranks six thin ones, and it keeps working while you sleep.

## Recycle deliberately

The monthly piece becomes a newsletter section, three social posts, and a slide in the sales deck. That is not laziness, it is distribution.

## Measure one number

Pick the metric the content is supposed to move and ignore the rest of the dashboard. Traffic that never turns into conversations is a vanity spreadsheet."#,
    },
    StaticPost {
        id: 6,
        slug: "ecommerce-conversion-optimization",
        title: "E-commerce Conversion: Fix the Checkout Before the Homepage",
        excerpt: "Shops lose more revenue in the last three clicks than in the first thirty. Where to look and what to test.",
        date: "2023-10-09",
        category: "Marketing",
        image: "/assets/blog/ecommerce-cro-card.webp",
        detail_image: "/assets/blog/ecommerce-cro-hero.webp",
        body: r#"Every e-commerce redesign brief starts with the homepage. Almost none of the lost revenue lives there. The money leaks out between the product page and the payment confirmation.

## The audit order that pays

1. Checkout: forced account creation, surprise shipping costs, dead payment methods.
2. Product page: missing sizing data, photos that hide the flaw people return it for.
3. Category page: filters that do not match how customers think.
4. Homepage: last, and only after the above stop bleeding.

## Test one lever at a time

A/B tests on low-traffic shops need weeks to settle. Change the single highest-friction step, wait, and resist the urge to redesign mid-test. Patience is the cheapest optimisation tool you own."#,
    },
    StaticPost {
        id: 7,
        slug: "website-redesign-process",
        title: "Our Website Redesign Process, Start to Launch",
        excerpt: "What actually happens in the twelve weeks between the kickoff call and the launch checklist.",
        date: "2024-01-15",
        category: "Agency",
        image: "/assets/blog/redesign-process-card.webp",
        detail_image: "/assets/blog/redesign-process-hero.webp",
        body: r#"Clients ask what they are paying for between signature and launch. Fair question. Here is the process, week by week, with the boring parts left in.

## Weeks 1-3: discovery

We interview the people who answer your support tickets, not just the founders. The current site's analytics tell us what to keep; most redesigns destroy pages that were quietly converting.

## Weeks 4-8: design and content in parallel

Design without real copy is fiction. We draft content alongside wireframes so the layout serves sentences that exist.

## Weeks 9-12: build, migrate, launch

Redirect maps come first, because broken URLs burn rankings a fresh web design cannot buy back. Launch happens on a Tuesday morning, never a Friday."#,
    },
    StaticPost {
        id: 8,
        slug: "social-media-advertising",
        title: "Paid Social Without Burning the Budget",
        excerpt: "Creative fatigue, not targeting, kills most campaigns. A rotation system that keeps cost per result flat.",
        date: "2024-03-27",
        category: "Marketing",
        image: "/assets/blog/paid-social-card.webp",
        detail_image: "/assets/blog/paid-social-hero.webp",
        body: r#"Paid social platforms have automated most of the targeting decisions you used to bill hours for. What they cannot automate is creative, and creative is where campaigns now live or die.

## The fatigue curve

Every ad has a shelf life. Watch frequency and cost per result; when both climb in the same week, the audience is tired of the asset, not the offer.

## A rotation that works

Keep three concepts live, retire the worst performer every two weeks, and brief its replacement from what the surviving two have in common. You are running a tournament, not a gallery.

## Landing pages are part of the ad

Half of paid social budgets die on a landing page that loads slowly or restates the ad without advancing it. Check the page on a phone before you blame the channel."#,
    },
    StaticPost {
        id: 9,
        slug: "core-web-vitals",
        title: "Core Web Vitals for Marketing Sites",
        excerpt: "LCP, CLS, and INP translated into decisions a design team can act on without reading a spec.",
        date: "2024-06-10",
        category: "SEO",
        image: "/assets/blog/core-web-vitals-card.webp",
        detail_image: "/assets/blog/core-web-vitals-hero.webp",
        body: r#"Core web vitals are three numbers Google uses to score the experience of loading your page. They are also the rare performance metrics a non-engineer can reason about.

## LCP: the big thing, fast

Largest Contentful Paint measures when the main image or headline appears. Hero videos and font-loading strategies are the usual suspects; preload the hero asset and show text in a fallback face immediately.

## CLS: nothing jumps

Cumulative Layout Shift punishes content that moves after it appears. Reserve space for images and embeds with explicit dimensions. Late-loading banners are the classic offender.

## INP: taps respond

Interaction to Next Paint catches pages that look loaded but freeze on tap. Heavy scroll-animation libraries are a frequent cause; budget your JavaScript like you budget your ad spend."#,
    },
    StaticPost {
        id: 10,
        slug: "choosing-a-digital-agency",
        title: "How to Choose a Digital Agency (From One)",
        excerpt: "The questions that separate a production partner from a deck factory, and the red flags hiding in proposals.",
        date: "2024-09-02",
        category: "Agency",
        image: "/assets/blog/choosing-agency-card.webp",
        detail_image: "/assets/blog/choosing-agency-hero.webp",
        body: r#"Yes, we are an agency telling you how to buy agency work. Discount accordingly, then use the questions anyway; they are the ones our best clients asked us.

## Ask who does the work

The people in the pitch meeting are rarely the people in the project channel. Ask to meet the actual team, and ask how many other projects they will carry alongside yours.

## Ask for a failure

Any agency can show its greatest hits. Ask about a project that went sideways and what changed afterwards. A vague answer tells you how your crisis will be handled.

## Read the proposal for verbs

"Explore", "align", and "elevate" bill the same hours as "design", "build", and "ship" but deliver less. Scope written in concrete verbs is scope you can hold someone to."#,
    },
];
