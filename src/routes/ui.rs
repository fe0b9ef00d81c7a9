use axum::{response::Html, routing::get, Router};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Shopwise - AI Shopping Assistant</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 0; color: #1d1d1f; display: flex; }
    aside { width: 220px; padding: 1.5rem; background: #f6f8fa; min-height: 100vh; }
    main { flex: 1; padding: 2rem; max-width: 900px; }
    .tabs button { padding: 0.5rem 0.9rem; margin-right: 0.25rem; border: 1px solid #ddd; background: #fff; border-radius: 6px 6px 0 0; cursor: pointer; }
    .tabs button.active { background: #1d1d1f; color: #fff; }
    .card { border: 1px solid #ddd; padding: 1rem; border-radius: 0 8px 8px 8px; margin-bottom: 1rem; }
    .panel { display: none; }
    .panel.active { display: block; }
    label { display: block; margin-top: 0.75rem; font-weight: 600; }
    input, textarea, select { width: 100%; padding: 0.5rem; box-sizing: border-box; }
    button.run { margin-top: 1rem; padding: 0.6rem 1rem; }
    .error { color: #b00020; }
    pre { background: #f6f8fa; padding: 1rem; overflow: auto; white-space: pre-wrap; }
  </style>
</head>
<body>
  <aside>
    <h3>Preferences</h3>
    <label>Currency</label>
    <select id="currency">
      <option>₹ INR</option>
      <option>$ USD</option>
      <option>€ EUR</option>
    </select>
    <label>Region</label>
    <select id="region">
      <option>India</option>
      <option>USA</option>
      <option>Europe</option>
      <option>Global</option>
    </select>
  </aside>
  <main>
    <h1>Shopwise</h1>
    <p>Recommendations, review analysis, buying guides, comparisons and trending deals.</p>

    <div class="tabs">
      <button data-tab="budget" class="active">Budget Optimizer</button>
      <button data-tab="reviews">Review Analysis</button>
      <button data-tab="guide">Buying Guide</button>
      <button data-tab="compare">Compare Products</button>
      <button data-tab="trending">Trending Products</button>
    </div>

    <div class="card">
      <div class="panel active" id="panel-budget">
        <label>Shopping list</label>
        <textarea id="shoppingList" rows="4">wireless headphones, ergonomic mouse, laptop backpack</textarea>
        <label>Budget (₹)</label>
        <input id="budget" type="number" min="500" max="500000" step="500" value="15000" />
        <label>Priority</label>
        <select id="priority">
          <option>Best Value</option>
          <option>Premium Quality</option>
          <option>Budget Conscious</option>
          <option>Latest Technology</option>
        </select>
        <button class="run" data-action="budget">Optimize My Shopping</button>
      </div>
      <div class="panel" id="panel-reviews">
        <label>Product page URL</label>
        <input id="productUrl" placeholder="https://amazon.in/product-page" />
        <button class="run" data-action="reviews">Analyze Reviews</button>
      </div>
      <div class="panel" id="panel-guide">
        <label>Product type</label>
        <input id="productType" placeholder="e.g., Smartwatch, Laptop, Camera" />
        <button class="run" data-action="guide">Get Buying Guide</button>
      </div>
      <div class="panel" id="panel-compare">
        <label>Product name</label>
        <input id="productName" placeholder="e.g., iPhone 15 Pro, Samsung Galaxy S24" />
        <button class="run" data-action="compare">Compare Products</button>
      </div>
      <div class="panel" id="panel-trending">
        <p>Trending products under ₹1000 right now.</p>
        <button class="run" data-action="trending">Get Trending Products</button>
      </div>
    </div>

    <div class="card">
      <h2 id="resultTitle">Output</h2>
      <pre id="output"></pre>
    </div>
  </main>

  <script>
    const output = document.getElementById('output');
    const resultTitle = document.getElementById('resultTitle');
    const value = id => document.getElementById(id).value;

    document.querySelectorAll('.tabs button').forEach(tab => {
      tab.addEventListener('click', () => {
        document.querySelectorAll('.tabs button').forEach(t => t.classList.remove('active'));
        document.querySelectorAll('.panel').forEach(p => p.classList.remove('active'));
        tab.classList.add('active');
        document.getElementById('panel-' + tab.dataset.tab).classList.add('active');
      });
    });

    const actions = {
      budget: () => ['/api/recommendations', {
        shopping_list: value('shoppingList'),
        budget: Number(value('budget')),
        priority: value('priority')
      }],
      reviews: () => ['/api/reviews', { product_url: value('productUrl') }],
      guide: () => ['/api/buying-guide', { product_type: value('productType') }],
      compare: () => ['/api/compare', { product_name: value('productName') }],
      trending: () => ['/api/trending', {}]
    };

    document.querySelectorAll('button.run').forEach(btn => {
      btn.addEventListener('click', async () => {
        const [url, payload] = actions[btn.dataset.action]();
        payload.currency = value('currency');
        payload.region = value('region');
        output.classList.remove('error');
        resultTitle.textContent = 'Working...';
        output.textContent = '';
        btn.disabled = true;
        try {
          const res = await fetch(url, {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify(payload)
          });
          const json = await res.json();
          if (!res.ok) {
            resultTitle.textContent = 'Output';
            output.classList.add('error');
            output.textContent = json.error || 'Request failed';
            return;
          }
          resultTitle.textContent = json.title;
          output.textContent = json.content;
        } catch (e) {
          resultTitle.textContent = 'Output';
          output.classList.add('error');
          output.textContent = String(e);
        } finally {
          btn.disabled = false;
        }
      });
    });
  </script>
</body>
</html>"#)
}
